//! Per-chain liquidity graph store (§3.3, §4.2).
//!
//! A `DashMap`-backed adjacency structure, generalizing the teacher's
//! `PoolStateManager` (`src/pool/state.rs`) from a flat `(DexType, symbol)`
//! key to the registry's canonical `TokenRef` graph with tiered refresh
//! bookkeeping layered on top.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use super::edge::PoolEdge;
use super::node::TokenNode;
use super::snapshot::GraphSnapshot;
use crate::types::{CanonicalChainId, TokenRef};
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LiquidityTier {
    Hot,
    Warm,
    Cold,
}

impl LiquidityTier {
    /// §4.2 tiering thresholds. `evict_usd` is handled separately by the
    /// builder since eviction is a distinct action from re-tiering.
    pub fn classify(liquidity_usd: f64, hot_min: f64, warm_min: f64) -> LiquidityTier {
        if liquidity_usd >= hot_min {
            LiquidityTier::Hot
        } else if liquidity_usd >= warm_min {
            LiquidityTier::Warm
        } else {
            LiquidityTier::Cold
        }
    }

    /// One demotion step: Hot -> Warm -> Cold -> Cold. Used after three
    /// consecutive refresh failures (§4.2).
    pub fn demote(self) -> LiquidityTier {
        match self {
            LiquidityTier::Hot => LiquidityTier::Warm,
            LiquidityTier::Warm => LiquidityTier::Cold,
            LiquidityTier::Cold => LiquidityTier::Cold,
        }
    }
}

#[derive(Debug, Default)]
struct EdgeHealth {
    consecutive_failures: AtomicU32,
}

/// Lock-free concurrent store for one chain's pools. Readers (pathfinder,
/// via `snapshot()`) never block behind the builder's writes; only the
/// builder is expected to call the mutating methods (§3.5 ownership note),
/// and a mutex serializes those writes per §4.2's "mutation... is serialized".
pub struct LiquidityGraph {
    chain: CanonicalChainId,
    nodes: DashMap<TokenRef, TokenNode>,
    edges_by_id: DashMap<String, PoolEdge>,
    /// token -> ids of every edge touching it (multi-dex pairs keep several).
    adjacency: DashMap<TokenRef, DashSet<String>>,
    tiers: DashMap<String, LiquidityTier>,
    health: DashMap<String, EdgeHealth>,
    write_lock: Mutex<()>,
}

impl LiquidityGraph {
    pub fn new(chain: CanonicalChainId) -> Self {
        Self {
            chain,
            nodes: DashMap::new(),
            edges_by_id: DashMap::new(),
            adjacency: DashMap::new(),
            tiers: DashMap::new(),
            health: DashMap::new(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn chain(&self) -> CanonicalChainId {
        self.chain
    }

    pub fn upsert_node(&self, node: TokenNode) {
        self.nodes.insert(node.token_ref.clone(), node);
    }

    pub fn get_node(&self, token: &TokenRef) -> Option<TokenNode> {
        self.nodes.get(token).map(|e| e.value().clone())
    }

    /// Upserts one edge atomically; eviction and tier transitions are
    /// independent per-edge decisions - there is no all-or-nothing for a
    /// full chain refresh (§4.2 failure semantics).
    pub fn upsert_edge(&self, edge: PoolEdge, hot_min: f64, warm_min: f64) -> bool {
        let _guard = self.write_lock.lock().unwrap();

        if let Some(previous) = self.edges_by_id.get(&edge.id) {
            if let Err(e) = edge.validate(Some(previous.value())) {
                warn!(edge_id = %edge.id, error = %e, "rejecting edge update: invariant violated");
                return false;
            }
        } else if let Err(e) = edge.validate(None) {
            warn!(edge_id = %edge.id, error = %e, "rejecting new edge: invariant violated");
            return false;
        }

        self.adjacency
            .entry(edge.token_a.clone())
            .or_default()
            .insert(edge.id.clone());
        self.adjacency
            .entry(edge.token_b.clone())
            .or_default()
            .insert(edge.id.clone());

        self.tiers.insert(
            edge.id.clone(),
            LiquidityTier::classify(edge.liquidity_usd, hot_min, warm_min),
        );
        self.health.entry(edge.id.clone()).or_default();
        self.health
            .get(&edge.id)
            .unwrap()
            .consecutive_failures
            .store(0, Ordering::Relaxed);

        debug!(edge_id = %edge.id, dex = %edge.dex, "upserted pool edge");
        self.edges_by_id.insert(edge.id.clone(), edge);
        true
    }

    pub fn remove_edge(&self, edge_id: &str) -> Option<PoolEdge> {
        let _guard = self.write_lock.lock().unwrap();
        let removed = self.edges_by_id.remove(edge_id).map(|(_, e)| e);
        if let Some(edge) = &removed {
            if let Some(set) = self.adjacency.get(&edge.token_a) {
                set.remove(edge_id);
            }
            if let Some(set) = self.adjacency.get(&edge.token_b) {
                set.remove(edge_id);
            }
            self.tiers.remove(edge_id);
            self.health.remove(edge_id);
        }
        removed
    }

    /// Records a failed refresh attempt for `edge_id`. After three
    /// consecutive failures the edge drops one liquidity tier (§4.2); a
    /// fetcher failure never removes the edge outright.
    pub fn record_refresh_failure(&self, edge_id: &str) {
        let entry = self.health.entry(edge_id.to_string()).or_default();
        let failures = entry.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= 3 {
            if let Some(mut tier) = self.tiers.get_mut(edge_id) {
                let demoted = tier.demote();
                warn!(edge_id, from = ?*tier, to = ?demoted, "edge demoted after 3 consecutive refresh failures");
                *tier = demoted;
            }
            entry.consecutive_failures.store(0, Ordering::Relaxed);
        }
    }

    /// Evicts every edge currently below `threshold_usd` liquidity.
    pub fn evict_below(&self, threshold_usd: f64) -> Vec<String> {
        let ids: Vec<String> = self
            .edges_by_id
            .iter()
            .filter(|e| e.value().liquidity_usd < threshold_usd)
            .map(|e| e.key().clone())
            .collect();
        for id in &ids {
            self.remove_edge(id);
        }
        ids
    }

    pub fn tier_of(&self, edge_id: &str) -> Option<LiquidityTier> {
        self.tiers.get(edge_id).map(|t| *t)
    }

    pub fn get_edge(&self, edge_id: &str) -> Option<PoolEdge> {
        self.edges_by_id.get(edge_id).map(|e| e.value().clone())
    }

    pub fn edge_count(&self) -> usize {
        self.edges_by_id.len()
    }

    /// An immutable, consistent-at-a-single-instant view safe for concurrent
    /// pathfinding (§4.2, §5). Cheap: cloning `PoolEdge`/`TokenNode` is just
    /// copying small value types and a couple of `String`s.
    pub fn snapshot(&self) -> GraphSnapshot {
        let edges: Vec<PoolEdge> = self.edges_by_id.iter().map(|e| e.value().clone()).collect();
        let nodes: Vec<TokenNode> = self.nodes.iter().map(|e| e.value().clone()).collect();
        GraphSnapshot::new(self.chain, nodes, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AmountRaw, ChainAddress};
    use alloy::primitives::{Address, U256};

    fn token(byte: u8) -> TokenRef {
        TokenRef::new(CanonicalChainId(1), ChainAddress::Evm(Address::repeat_byte(byte)))
    }

    fn edge(id: &str, liquidity_usd: f64) -> PoolEdge {
        PoolEdge::new_canonical(
            id.to_string(),
            CanonicalChainId(1),
            token(1),
            token(2),
            "uniswap".into(),
            None,
            "0xpair".into(),
            AmountRaw::new(U256::from(1_000u64)),
            AmountRaw::new(U256::from(2_000u64)),
            30,
            liquidity_usd,
            chrono::Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn upsert_then_snapshot_sees_edge() {
        let graph = LiquidityGraph::new(CanonicalChainId(1));
        graph.upsert_edge(edge("e1", 2_000_000.0), 1_000_000.0, 100_000.0);
        assert_eq!(graph.tier_of("e1"), Some(LiquidityTier::Hot));
        let snap = graph.snapshot();
        assert_eq!(snap.neighbors(&token(1)).count(), 1);
    }

    #[test]
    fn three_failures_demotes_tier() {
        let graph = LiquidityGraph::new(CanonicalChainId(1));
        graph.upsert_edge(edge("e1", 2_000_000.0), 1_000_000.0, 100_000.0);
        for _ in 0..3 {
            graph.record_refresh_failure("e1");
        }
        assert_eq!(graph.tier_of("e1"), Some(LiquidityTier::Warm));
    }

    #[test]
    fn eviction_removes_low_liquidity_edges() {
        let graph = LiquidityGraph::new(CanonicalChainId(1));
        graph.upsert_edge(edge("e1", 5_000.0), 1_000_000.0, 100_000.0);
        let evicted = graph.evict_below(10_000.0);
        assert_eq!(evicted, vec!["e1".to_string()]);
        assert!(graph.get_edge("e1").is_none());
    }

    #[test]
    fn failed_refresh_never_removes_existing_edge() {
        let graph = LiquidityGraph::new(CanonicalChainId(1));
        graph.upsert_edge(edge("e1", 2_000_000.0), 1_000_000.0, 100_000.0);
        graph.record_refresh_failure("e1");
        assert!(graph.get_edge("e1").is_some());
    }
}

//! Liquidity graph maintenance path (§4.2, §6.2).
//!
//! Generalizes the teacher's per-DEX `sync_pool` calls in `pool/syncer.rs` /
//! `pool/v2_syncer.rs` / `pool/v3_syncer.rs` into one source-agnostic merge
//! loop over any number of `PairFetcher` implementations.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use super::edge::PoolEdge;
use super::store::LiquidityGraph;
use crate::config::RouterConfig;
use crate::types::CanonicalChainId;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error, Clone)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rate limited")]
    RateLimited,
    #[error("chain {0} not supported by this source")]
    UnsupportedChain(u32),
}

/// A pair/reserve data source (§6.2). Subgraph indexers, DEX-aggregator
/// REST APIs, and on-chain reserve readers all implement this uniformly.
#[async_trait]
pub trait PairFetcher: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_pairs(
        &self,
        chain: CanonicalChainId,
        since_min_liquidity_usd: f64,
    ) -> Result<Vec<PoolEdge>, FetchError>;

    async fn fetch_reserves(
        &self,
        pool_ids: &[String],
    ) -> Result<HashMap<String, (alloy::primitives::U256, alloy::primitives::U256, chrono::DateTime<chrono::Utc>)>, FetchError>;
}

/// On-chain readers additionally expose factory/pair lookups (§6.2).
#[async_trait]
pub trait OnChainReserveReader: PairFetcher {
    async fn get_factory_pair(&self, factory: &str, token_a: &str, token_b: &str) -> Result<Option<String>, FetchError>;
    async fn get_pair_reserves(
        &self,
        pool_address: &str,
    ) -> Result<(alloy::primitives::U256, alloy::primitives::U256, chrono::DateTime<chrono::Utc>), FetchError>;
}

/// Deterministic in-memory fetcher used by tests, demos, and the `route-cli`
/// binary - stands in for a live subgraph/REST source without requiring
/// network access.
pub struct StaticSeedFetcher {
    name: String,
    pairs: Vec<PoolEdge>,
}

impl StaticSeedFetcher {
    pub fn new(name: impl Into<String>, pairs: Vec<PoolEdge>) -> Self {
        Self {
            name: name.into(),
            pairs,
        }
    }
}

#[async_trait]
impl PairFetcher for StaticSeedFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_pairs(
        &self,
        chain: CanonicalChainId,
        since_min_liquidity_usd: f64,
    ) -> Result<Vec<PoolEdge>, FetchError> {
        Ok(self
            .pairs
            .iter()
            .filter(|p| p.chain == chain && p.liquidity_usd >= since_min_liquidity_usd)
            .cloned()
            .collect())
    }

    async fn fetch_reserves(
        &self,
        pool_ids: &[String],
    ) -> Result<HashMap<String, (alloy::primitives::U256, alloy::primitives::U256, chrono::DateTime<chrono::Utc>)>, FetchError> {
        Ok(self
            .pairs
            .iter()
            .filter(|p| pool_ids.contains(&p.id))
            .map(|p| (p.id.clone(), (p.reserves.0 .0, p.reserves.1 .0, p.last_updated)))
            .collect())
    }
}

/// §4.2: report per-edge outcomes of one full-chain refresh. The chain
/// remains queryable throughout - this is a summary, not a gate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReport {
    pub pairs_scanned: usize,
    pub pairs_updated: usize,
    pub pairs_evicted: usize,
    pub errors: Vec<String>,
}

/// Owns the set of pluggable data sources for one deployment and drives
/// `refresh_chain` against a `LiquidityGraph`. Only the builder is expected
/// to call the graph's mutating methods (§3.5 single-writer ownership).
pub struct GraphBuilder {
    fetchers: Vec<Box<dyn PairFetcher>>,
}

impl GraphBuilder {
    pub fn new(fetchers: Vec<Box<dyn PairFetcher>>) -> Self {
        Self { fetchers }
    }

    /// Tries each source in order and merges (§4.2): an edge is valid if any
    /// source confirms its reserves non-empty. A source failure never
    /// removes existing edges - it only skips that source's contribution.
    pub async fn refresh_chain(&self, graph: &LiquidityGraph, config: &RouterConfig) -> UpdateReport {
        let mut report = UpdateReport::default();
        let mut merged: HashMap<String, PoolEdge> = HashMap::new();

        for fetcher in &self.fetchers {
            match fetcher
                .fetch_pairs(graph.chain(), config.evict_threshold_usd as f64)
                .await
            {
                Ok(edges) => {
                    for edge in edges {
                        if edge.reserves.0.is_zero() || edge.reserves.1.is_zero() {
                            continue;
                        }
                        merged
                            .entry(edge.id.clone())
                            .and_modify(|existing| {
                                if edge.last_updated >= existing.last_updated {
                                    *existing = edge.clone();
                                }
                            })
                            .or_insert(edge);
                    }
                }
                Err(e) => {
                    warn!(source = fetcher.name(), error = %e, "pair fetch failed, skipping source this round");
                    report.errors.push(format!("{}: {e}", fetcher.name()));
                }
            }
        }

        report.pairs_scanned = merged.len();
        for (id, edge) in merged {
            if graph.upsert_edge(edge, config.hot_tier_min_liquidity_usd as f64, config.warm_tier_min_liquidity_usd as f64) {
                report.pairs_updated += 1;
            } else {
                graph.record_refresh_failure(&id);
                report.errors.push(format!("edge {id} failed invariant validation"));
            }
        }

        let evicted = graph.evict_below(config.evict_threshold_usd as f64);
        report.pairs_evicted = evicted.len();

        info!(
            chain = graph.chain().0,
            scanned = report.pairs_scanned,
            updated = report.pairs_updated,
            evicted = report.pairs_evicted,
            error_count = report.errors.len(),
            "chain refresh complete"
        );
        report
    }
}

/// Merges results from every configured fetcher without owning a specific
/// transport; the policy (try in order, any-source-confirms) is spec'd in
/// §4.2 and implemented by `GraphBuilder::refresh_chain` directly, so this
/// type exists to name the pattern where a caller wants it as a single
/// `PairFetcher` (e.g. nesting a multi-source group inside another builder).
pub struct MultiSourceFetcher {
    name: String,
    sources: Vec<Box<dyn PairFetcher>>,
}

impl MultiSourceFetcher {
    pub fn new(name: impl Into<String>, sources: Vec<Box<dyn PairFetcher>>) -> Self {
        Self {
            name: name.into(),
            sources,
        }
    }
}

#[async_trait]
impl PairFetcher for MultiSourceFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_pairs(
        &self,
        chain: CanonicalChainId,
        since_min_liquidity_usd: f64,
    ) -> Result<Vec<PoolEdge>, FetchError> {
        let mut merged: HashMap<String, PoolEdge> = HashMap::new();
        let mut last_err = None;
        for source in &self.sources {
            match source.fetch_pairs(chain, since_min_liquidity_usd).await {
                Ok(edges) => {
                    for edge in edges {
                        if !edge.reserves.0.is_zero() && !edge.reserves.1.is_zero() {
                            merged.entry(edge.id.clone()).or_insert(edge);
                        }
                    }
                }
                Err(e) => last_err = Some(e),
            }
        }
        if merged.is_empty() {
            if let Some(e) = last_err {
                return Err(e);
            }
        }
        Ok(merged.into_values().collect())
    }

    async fn fetch_reserves(
        &self,
        pool_ids: &[String],
    ) -> Result<HashMap<String, (alloy::primitives::U256, alloy::primitives::U256, chrono::DateTime<chrono::Utc>)>, FetchError> {
        let mut merged = HashMap::new();
        for source in &self.sources {
            if let Ok(reserves) = source.fetch_reserves(pool_ids).await {
                merged.extend(reserves);
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AmountRaw, ChainAddress, TokenRef};
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

    struct FailingFetcher;

    #[async_trait]
    impl PairFetcher for FailingFetcher {
        fn name(&self) -> &str {
            "failing"
        }
        async fn fetch_pairs(&self, _chain: CanonicalChainId, _min: f64) -> Result<Vec<PoolEdge>, FetchError> {
            Err(FetchError::Transport("connection refused".into()))
        }
        async fn fetch_reserves(
            &self,
            _pool_ids: &[String],
        ) -> Result<HashMap<String, (U256, U256, chrono::DateTime<chrono::Utc>)>, FetchError> {
            Err(FetchError::Transport("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn refresh_merges_across_sources_and_survives_one_failing() {
        let graph = LiquidityGraph::new(CanonicalChainId(1));
        let good = StaticSeedFetcher::new("good", vec![edge("e1", 2_000_000.0)]);
        let builder = GraphBuilder::new(vec![Box::new(good), Box::new(FailingFetcher)]);
        let config = RouterConfig::default();

        let report = builder.refresh_chain(&graph, &config).await;
        assert_eq!(report.pairs_updated, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(graph.get_edge("e1").is_some());
    }

    #[tokio::test]
    async fn refresh_evicts_below_threshold() {
        let graph = LiquidityGraph::new(CanonicalChainId(1));
        let fetcher = StaticSeedFetcher::new("seed", vec![edge("e1", 5_000.0)]);
        let builder = GraphBuilder::new(vec![Box::new(fetcher)]);
        let mut config = RouterConfig::default();
        config.evict_threshold_usd = 0; // allow the fetch-side liquidity filter through
        let report = builder.refresh_chain(&graph, &config).await;
        assert_eq!(report.pairs_updated, 1);

        config.evict_threshold_usd = 10_000;
        let report2 = builder.refresh_chain(&graph, &config).await;
        assert_eq!(report2.pairs_evicted, 1);
        assert!(graph.get_edge("e1").is_none());
    }
}

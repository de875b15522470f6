//! C2: Liquidity Graph (§4.2).
//!
//! A per-chain `LiquidityGraph` is the unit of storage; `MultiChainGraph`
//! holds one per chain the deployment serves, generalizing the teacher's
//! single-chain `PoolStateManager` to the registry's multi-chain world.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

pub mod amm;
pub mod builder;
pub mod edge;
pub mod node;
pub mod snapshot;
pub mod store;

pub use builder::{FetchError, GraphBuilder, MultiSourceFetcher, OnChainReserveReader, PairFetcher, StaticSeedFetcher, UpdateReport};
pub use edge::{EdgeInvariantError, PoolEdge};
pub use node::{CategoryWhitelists, TokenCategory, TokenNode};
pub use snapshot::GraphSnapshot;
pub use store::{LiquidityGraph, LiquidityTier};

use crate::types::CanonicalChainId;
use dashmap::DashMap;
use std::sync::Arc;

/// Owns one `LiquidityGraph` per chain the deployment serves. Chains are
/// added lazily on first touch rather than pre-allocated for every
/// registered chain, since not every deployment routes through all of them.
#[derive(Default)]
pub struct MultiChainGraph {
    graphs: DashMap<CanonicalChainId, Arc<LiquidityGraph>>,
}

impl MultiChainGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self, chain: CanonicalChainId) -> Arc<LiquidityGraph> {
        self.graphs
            .entry(chain)
            .or_insert_with(|| Arc::new(LiquidityGraph::new(chain)))
            .clone()
    }

    pub fn snapshot(&self, chain: CanonicalChainId) -> Option<GraphSnapshot> {
        self.graphs.get(&chain).map(|g| g.snapshot())
    }

    pub fn chains(&self) -> Vec<CanonicalChainId> {
        self.graphs.iter().map(|e| *e.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazily_creates_and_reuses_the_same_graph_per_chain() {
        let mc = MultiChainGraph::new();
        let a = mc.graph(CanonicalChainId(1));
        let b = mc.graph(CanonicalChainId(1));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(mc.chains().len(), 1);
    }
}

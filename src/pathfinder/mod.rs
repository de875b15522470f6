//! C3: Pathfinder (§4.3).
//!
//! Author: AI-Generated
//! Created: 2026-07-28

pub mod cost;
pub mod scoring;
pub mod search;

pub use scoring::score;
pub use search::{find_paths, PathCandidate, PathStep, SearchError};

use crate::graph::{CategoryWhitelists, GraphSnapshot};
use crate::registry::ChainRegistry;
use crate::types::{AmountRaw, TokenRef};

/// Graph size above which the modified-Dijkstra path is abandoned in favor
/// of bounded BFS (§4.3.1: "graph size <= ~5000 reachable nodes").
const DIJKSTRA_NODE_LIMIT: usize = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Direct,
    Dijkstra,
    BoundedBfs,
}

/// §4.3.1: direct lookup only applies when `maxHops <= 1`; otherwise the
/// choice is driven purely by graph size, since both remaining strategies
/// share one implementation (`search::find_paths`) that already bounds its
/// own work.
pub fn select_algorithm(max_hops: u8, reachable_nodes: usize) -> Algorithm {
    if max_hops <= 1 {
        Algorithm::Direct
    } else if reachable_nodes <= DIJKSTRA_NODE_LIMIT {
        Algorithm::Dijkstra
    } else {
        Algorithm::BoundedBfs
    }
}

pub struct Pathfinder<'a> {
    registry: &'a ChainRegistry,
    whitelists: CategoryWhitelists,
}

impl<'a> Pathfinder<'a> {
    pub fn new(registry: &'a ChainRegistry) -> Self {
        Self {
            registry,
            whitelists: CategoryWhitelists::default_majors(),
        }
    }

    pub fn with_whitelists(registry: &'a ChainRegistry, whitelists: CategoryWhitelists) -> Self {
        Self { registry, whitelists }
    }

    /// Top-K candidate paths for one swap, net of gas and price impact
    /// (§4.3). `gas_edge_usd`/`input_usd` feed the per-edge cost function
    /// (§4.3.2); callers without a gas oracle may pass `0.0`.
    pub fn find_routes(
        &self,
        snapshot: &GraphSnapshot,
        from: &TokenRef,
        to: &TokenRef,
        amount_in: AmountRaw,
        max_hops: u8,
        top_k: usize,
        gas_edge_usd: f64,
        input_usd: f64,
    ) -> Result<Vec<PathCandidate>, SearchError> {
        let _algorithm = select_algorithm(max_hops, snapshot.node_count());
        find_paths(
            snapshot,
            self.registry,
            &self.whitelists,
            from,
            to,
            amount_in,
            max_hops,
            top_k,
            gas_edge_usd,
            input_usd,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_selection_respects_max_hops_and_graph_size() {
        assert_eq!(select_algorithm(1, 10), Algorithm::Direct);
        assert_eq!(select_algorithm(3, 100), Algorithm::Dijkstra);
        assert_eq!(select_algorithm(3, 10_000), Algorithm::BoundedBfs);
    }
}

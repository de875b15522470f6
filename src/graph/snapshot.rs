//! Immutable point-in-time graph view used by one pathfinder invocation
//! (§3.3, §4.2, §5 "graph snapshot consistency").
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use super::edge::PoolEdge;
use super::node::TokenNode;
use crate::types::{CanonicalChainId, TokenRef};
use std::collections::HashMap;

pub struct GraphSnapshot {
    chain: CanonicalChainId,
    nodes: HashMap<TokenRef, TokenNode>,
    edges_by_id: HashMap<String, PoolEdge>,
    adjacency: HashMap<TokenRef, Vec<String>>,
}

impl GraphSnapshot {
    pub(crate) fn new(chain: CanonicalChainId, nodes: Vec<TokenNode>, edges: Vec<PoolEdge>) -> Self {
        let mut adjacency: HashMap<TokenRef, Vec<String>> = HashMap::new();
        let mut edges_by_id = HashMap::with_capacity(edges.len());
        for edge in edges {
            adjacency
                .entry(edge.token_a.clone())
                .or_default()
                .push(edge.id.clone());
            adjacency
                .entry(edge.token_b.clone())
                .or_default()
                .push(edge.id.clone());
            edges_by_id.insert(edge.id.clone(), edge);
        }
        let nodes = nodes.into_iter().map(|n| (n.token_ref.clone(), n)).collect();
        Self {
            chain,
            nodes,
            edges_by_id,
            adjacency,
        }
    }

    pub fn chain(&self) -> CanonicalChainId {
        self.chain
    }

    pub fn neighbors(&self, token: &TokenRef) -> impl Iterator<Item = &PoolEdge> {
        self.adjacency
            .get(token)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.edges_by_id.get(id))
    }

    pub fn node(&self, token: &TokenRef) -> Option<&TokenNode> {
        self.nodes.get(token)
    }

    pub fn edge(&self, id: &str) -> Option<&PoolEdge> {
        self.edges_by_id.get(id)
    }

    pub fn has_direct_edge(&self, a: &TokenRef, b: &TokenRef) -> Option<&PoolEdge> {
        self.neighbors(a).find(|e| e.other_token(a) == Some(b))
    }

    pub fn all_nodes(&self) -> impl Iterator<Item = &TokenNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

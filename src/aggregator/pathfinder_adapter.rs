//! Wraps the C3 pathfinder as a `RouterAdapter` so the aggregator can fan
//! out over on-graph routing and external adapters uniformly (§4.5).
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::adapters::{AdapterContext, AdapterError, Capabilities, RouterAdapter};
use crate::config::RouterConfig;
use crate::graph::{MultiChainGraph, TokenNode};
use crate::pathfinder::Pathfinder;
use crate::registry::ChainRegistry;
use crate::types::{Route, RouteStep, RouteRequest, SlippagePolicy, TokenRef};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::pricing::amount_to_usd;

pub struct PathfinderAdapter {
    registry: Arc<ChainRegistry>,
    graphs: Arc<MultiChainGraph>,
    max_hops: u8,
}

impl PathfinderAdapter {
    pub fn new(registry: Arc<ChainRegistry>, graphs: Arc<MultiChainGraph>, config: &RouterConfig) -> Self {
        Self {
            registry,
            graphs,
            max_hops: config.max_hops,
        }
    }
}

#[async_trait]
impl RouterAdapter for PathfinderAdapter {
    fn name(&self) -> &str {
        "pathfinder"
    }

    fn supports(&self, from: &TokenRef, to: &TokenRef) -> bool {
        from.chain == to.chain
    }

    async fn quote(&self, request: &RouteRequest, ctx: &AdapterContext) -> Result<Route, AdapterError> {
        if ctx.cancel.is_cancelled() {
            return Err(AdapterError::Timeout {
                adapter: self.name().into(),
                elapsed_ms: ctx.deadline.as_millis() as u64,
            });
        }
        if !self.supports(&request.from, &request.to) {
            return Err(AdapterError::UnsupportedChain {
                adapter: self.name().into(),
                chain_id: request.to.chain.0,
            });
        }

        let snapshot = self
            .graphs
            .snapshot(request.from.chain)
            .ok_or_else(|| AdapterError::NoRoute { adapter: self.name().into() })?;

        let pathfinder = Pathfinder::new(&self.registry);
        let candidates = pathfinder
            .find_routes(&snapshot, &request.from, &request.to, request.amount_in, self.max_hops, 3, 0.0, 0.0)
            .map_err(|e| AdapterError::Invalid {
                adapter: self.name().into(),
                field: "amount_in".into(),
                detail: e.to_string(),
            })?;

        let best = candidates.into_iter().next().ok_or_else(|| AdapterError::NoRoute { adapter: self.name().into() })?;

        let bps = request.slippage.ceiling_bps();
        let amount_out_min = best.amount_out.apply_slippage_floor(bps);

        let steps = best
            .steps
            .iter()
            .map(|s| RouteStep::Swap {
                chain: request.from.chain,
                from_token: s.token_in.clone(),
                to_token: s.token_out.clone(),
                dex: s.dex.clone(),
                amount_in: s.amount_in,
                amount_out_quoted: s.amount_out,
                pool_path: vec![s.edge_id.clone()],
                raw_amount_out: None,
            })
            .collect();

        Ok(Route {
            id: Uuid::new_v4().to_string(),
            source: self.name().to_string(),
            steps,
            amount_in: request.amount_in,
            amount_out_quoted: best.amount_out,
            amount_out_min,
            price_impact_bps: (best.price_impact_ratio * 10_000.0).round() as u32,
            gas_estimate_usd: Decimal::new((best.hop_count() as i64) * 150, 2),
            total_fees_usd: Decimal::ZERO,
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(30),
            slippage_clamped_at: match request.slippage {
                SlippagePolicy::Auto { max_bps } => Some(max_bps),
                SlippagePolicy::Fixed { .. } => None,
            },
            requires_exact_simulation: false,
        })
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            cross_chain: false,
            max_slippage_bps: 1000,
            supports_exact_out: false,
            priority: 1,
        }
    }
}

/// Used by the aggregator's scoring pass (§4.3.3), which needs each route's
/// USD value; kept here since it's pathfinder-result-shaped (`TokenNode`
/// lookups), not adapter-output-shaped.
pub fn route_output_usd(node: Option<&TokenNode>, route: &Route) -> f64 {
    match node {
        Some(n) => amount_to_usd(route.amount_out_quoted, n),
        None => 0.0,
    }
}

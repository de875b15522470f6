//! C5: Quote Aggregator (§4.5).
//!
//! Generalizes the teacher's multi-strategy dispatch loop
//! (`paper_trading/engine.rs`'s `Engine`, which fans events out to every
//! registered `Strategy` and collects their actions without letting one
//! strategy's failure abort the batch) from a sequential loop into an
//! `N`-way `tokio::spawn` fan-out over every eligible `RouterAdapter`,
//! raced against a shared per-request deadline.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

pub mod pathfinder_adapter;
pub mod pricing;

pub use pathfinder_adapter::PathfinderAdapter;

use pathfinder_adapter::route_output_usd;
use pricing::amount_to_usd;
use crate::adapters::{AdapterContext, AdapterError, RouterAdapter};
use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::graph::MultiChainGraph;
use crate::pathfinder::score;
use crate::registry::ChainRegistry;
use crate::types::{Route, RouteRequest, RouteResponse, SlippagePolicy};
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// §4.5 step 6: candidates more than 5% below the top by `amountOutQuoted`
/// are dropped.
const CUTOFF_RATIO: f64 = 0.95;
/// §4.5 step 6: up to N candidates returned, default 3.
const DEFAULT_TOP_N: usize = 3;
/// §4.5 quote expiration cap, also enforced independently by
/// `RouterConfig::quote_validity`.
const MAX_QUOTE_VALIDITY: Duration = Duration::from_secs(45);
/// §4.4: adapter `priority` breaks ties between candidates whose §4.3.3
/// scores are within this fraction of each other.
const PRIORITY_TIE_BAND: f64 = 0.001;

pub struct QuoteAggregator {
    registry: Arc<ChainRegistry>,
    graphs: Arc<MultiChainGraph>,
    adapters: Vec<Arc<dyn RouterAdapter>>,
    config: RouterConfig,
    semaphores: HashMap<String, Arc<Semaphore>>,
}

impl QuoteAggregator {
    pub fn new(registry: Arc<ChainRegistry>, graphs: Arc<MultiChainGraph>, config: RouterConfig, mut adapters: Vec<Arc<dyn RouterAdapter>>) -> Self {
        adapters.push(Arc::new(PathfinderAdapter::new(registry.clone(), graphs.clone(), &config)));
        let semaphores = adapters
            .iter()
            .map(|a| (a.name().to_string(), Arc::new(Semaphore::new(config.adapter_concurrency_per_host))))
            .collect();
        Self {
            registry,
            graphs,
            adapters,
            config,
            semaphores,
        }
    }

    pub fn adapters(&self) -> &[Arc<dyn RouterAdapter>] {
        &self.adapters
    }

    fn validate(&self, request: &RouteRequest) -> Result<(), RouterError> {
        if request.amount_in.is_zero() {
            return Err(RouterError::InvalidRequest {
                field: "amount_in".into(),
                reason: "must be positive".into(),
            });
        }
        if request.deadline < Duration::from_millis(100) {
            return Err(RouterError::InvalidRequest {
                field: "deadline".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.registry.get_chain(request.from.chain).is_none() {
            return Err(RouterError::UnsupportedChain { chain_id: request.from.chain.0 });
        }
        if self.registry.get_chain(request.to.chain).is_none() {
            return Err(RouterError::UnsupportedChain { chain_id: request.to.chain.0 });
        }
        Ok(())
    }

    /// §4.5 step 2: same-chain requests use the pathfinder plus any adapter
    /// that declares direct support; cross-chain requests use only
    /// cross-chain-capable adapters (the Cross-Chain Route Builder registers
    /// itself as one such adapter when configured - see `crate::bridge`).
    fn eligible_sources(&self, request: &RouteRequest) -> Vec<Arc<dyn RouterAdapter>> {
        let cross_chain = request.from.chain != request.to.chain;
        self.adapters
            .iter()
            .filter(|a| {
                if cross_chain {
                    a.capabilities().cross_chain && a.supports(&request.from, &request.to)
                } else {
                    a.supports(&request.from, &request.to)
                }
            })
            .cloned()
            .collect()
    }

    /// §4.5: the full single-request protocol.
    pub async fn get_route(&self, request: RouteRequest) -> Result<RouteResponse, RouterError> {
        self.validate(&request)?;

        let deadline = self.config.effective_deadline(request.deadline.as_millis() as u64);
        let sources = self.eligible_sources(&request);
        if sources.is_empty() {
            return Err(RouterError::NoRoute { source_errors: vec![] });
        }

        let cancel = CancellationToken::new();
        let mut join_set: JoinSet<(String, Result<Route, AdapterError>)> = JoinSet::new();
        let mut pending: std::collections::HashSet<String> = std::collections::HashSet::new();

        for adapter in sources {
            let request = request.clone();
            let ctx = AdapterContext::new(deadline, cancel.clone());
            let name = adapter.name().to_string();
            pending.insert(name.clone());
            let semaphore = self
                .semaphores
                .get(&name)
                .cloned()
                .unwrap_or_else(|| Arc::new(Semaphore::new(self.config.adapter_concurrency_per_host)));
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = adapter.quote(&request, &ctx).await;
                (name, result)
            });
        }

        let mut candidates: Vec<Route> = Vec::new();
        let mut errors: Vec<AdapterError> = Vec::new();
        let mut fastest_elapsed = deadline;
        let started = std::time::Instant::now();

        let deadline_fut = tokio::time::sleep(deadline);
        tokio::pin!(deadline_fut);

        loop {
            tokio::select! {
                _ = &mut deadline_fut => {
                    cancel.cancel();
                    join_set.abort_all();
                    // Every adapter still in flight missed the deadline; it
                    // never gets a chance to report its own Timeout once
                    // aborted, so the aggregator synthesizes one (§8.3 S4).
                    for name in pending.drain() {
                        warn!(adapter = %name, "adapter missed deadline, aborting");
                        errors.push(AdapterError::Timeout { adapter: name, elapsed_ms: deadline.as_millis() as u64 });
                    }
                    break;
                }
                maybe_result = join_set.join_next() => {
                    match maybe_result {
                        None => break,
                        Some(Ok((name, Ok(route)))) => {
                            pending.remove(&name);
                            fastest_elapsed = fastest_elapsed.min(started.elapsed());
                            candidates.push(route);
                        }
                        Some(Ok((name, Err(e)))) => {
                            pending.remove(&name);
                            warn!(adapter = %name, error = %e, "adapter quote failed");
                            errors.push(e);
                        }
                        Some(Err(join_err)) => {
                            warn!(error = %join_err, "adapter task panicked or was cancelled");
                        }
                    }
                }
            }
        }

        if candidates.is_empty() {
            return Err(RouterError::NoRoute { source_errors: errors });
        }

        candidates = self.apply_slippage_clamp(candidates, &request.slippage);
        candidates = self.rank_by_score(&request, candidates);

        let top_amount = candidates[0].amount_out_quoted.0;
        let threshold = top_amount.saturating_mul(alloy::primitives::U256::from(95u32)) / alloy::primitives::U256::from(100u32);
        candidates.retain(|c| c.amount_out_quoted.0 >= threshold);
        candidates.truncate(DEFAULT_TOP_N);

        let validity = MAX_QUOTE_VALIDITY.min(self.config.quote_validity()).min(fastest_elapsed);
        let expires_at = chrono::Utc::now() + chrono::Duration::from_std(validity.max(Duration::from_secs(1))).unwrap();
        for route in candidates.iter_mut() {
            route.expires_at = expires_at;
        }

        info!(
            from = %request.from,
            to = %request.to,
            candidate_count = candidates.len(),
            error_count = errors.len(),
            "route aggregation complete"
        );

        let best = candidates.remove(0);
        Ok(RouteResponse {
            best: Some(best),
            alternatives: candidates,
            diagnostics: errors,
        })
    }

    /// §4.5 slippage handling: `Auto{maxBps}` clamps whatever an adapter
    /// chose down to the ceiling and records the clamp; `Fixed{bps}` is
    /// propagated unchanged (adapters already compute `amountOutMin` against
    /// it, so there is nothing to clamp).
    fn apply_slippage_clamp(&self, mut candidates: Vec<Route>, policy: &SlippagePolicy) -> Vec<Route> {
        if let SlippagePolicy::Auto { max_bps } = policy {
            for route in candidates.iter_mut() {
                let source_bps = route.slippage_clamped_at.unwrap_or(self.config.default_slippage_bps);
                if source_bps > *max_bps {
                    route.slippage_clamped_at = Some(*max_bps);
                    route.amount_out_min = route.amount_out_quoted.apply_slippage_floor(*max_bps);
                }
            }
        }
        candidates
    }

    /// §4.5 step 5: rank by the §4.3.3 score, breaking ties within
    /// `PRIORITY_TIE_BAND` by the originating adapter's declared `priority`
    /// (§4.4) - highest priority first.
    fn rank_by_score(&self, request: &RouteRequest, candidates: Vec<Route>) -> Vec<Route> {
        let mut scored: Vec<(Route, f64)> = candidates
            .into_iter()
            .map(|route| {
                let score = self.route_score(request, &route);
                (route, score)
            })
            .collect();

        scored.sort_by(|(route_a, score_a), (route_b, score_b)| {
            if scores_tied(*score_a, *score_b) {
                self.adapter_priority(&route_b.source).cmp(&self.adapter_priority(&route_a.source))
            } else {
                score_b.partial_cmp(score_a).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        scored.into_iter().map(|(route, _)| route).collect()
    }

    /// §4.3.3: `score = outputAmountUsd - gasCostUsd - priceImpactRatio *
    /// inputAmountUsd - protocolFeesUsd`. USD values come from the graph's
    /// `TokenNode` metadata when available; a missing node (e.g. a token the
    /// liquidity graph hasn't indexed yet) prices at $0 rather than failing
    /// the whole candidate, matching `route_output_usd`'s existing fallback.
    fn route_score(&self, request: &RouteRequest, route: &Route) -> f64 {
        let input_node = self.graphs.graph(request.from.chain).get_node(&request.from);
        let output_node = self.graphs.graph(request.to.chain).get_node(&request.to);

        let input_amount_usd = input_node.as_ref().map(|n| amount_to_usd(request.amount_in, n)).unwrap_or(0.0);
        let output_amount_usd = route_output_usd(output_node.as_ref(), route);
        let gas_cost_usd = route.gas_estimate_usd.to_f64().unwrap_or(0.0);
        let protocol_fees_usd = route.total_fees_usd.to_f64().unwrap_or(0.0);
        let price_impact_ratio = route.price_impact_bps as f64 / 10_000.0;

        score(output_amount_usd, gas_cost_usd, price_impact_ratio, input_amount_usd, protocol_fees_usd)
    }

    fn adapter_priority(&self, source: &str) -> i32 {
        self.adapters
            .iter()
            .find(|a| a.name() == source)
            .map(|a| a.capabilities().priority)
            .unwrap_or(0)
    }
}

/// §4.4: "scored outputs are within 0.1% of each other".
fn scores_tied(a: f64, b: f64) -> bool {
    let magnitude = a.abs().max(b.abs());
    if magnitude == 0.0 {
        return true;
    }
    ((a - b).abs() / magnitude) <= PRIORITY_TIE_BAND
}

//! C4: External Router Adapters (§4.4).
//!
//! `RouterAdapter` generalizes the teacher's `Strategy<Event, Action>`
//! async-trait pattern (`paper_trading/engine.rs`) from one concrete
//! strategy object per config preset to one implementation per external
//! router, each normalizing into the shared `Route`/`RouteStep` model.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

pub mod jupiter;
pub mod lifi;
pub mod relay;

use crate::types::{RouteRequest, TokenRef};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// §4.4 error taxonomy. Only `Timeout` and `RateLimited` are retryable, and
/// then at most once (enforced by the aggregator, not here).
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize, PartialEq)]
pub enum AdapterError {
    #[error("{adapter}: no route available")]
    NoRoute { adapter: String },
    #[error("{adapter}: insufficient liquidity")]
    InsufficientLiquidity { adapter: String },
    #[error("{adapter}: timed out after {elapsed_ms}ms")]
    Timeout { adapter: String, elapsed_ms: u64 },
    #[error("{adapter}: rate limited")]
    RateLimited { adapter: String },
    #[error("{adapter}: unsupported chain {chain_id}")]
    UnsupportedChain { adapter: String, chain_id: u32 },
    #[error("{adapter}: unsupported token {token:?}")]
    UnsupportedToken { adapter: String, token: TokenRef },
    #[error("{adapter}: transport error: {detail}")]
    Transport { adapter: String, detail: String },
    #[error("{adapter}: invalid field `{field}`: {detail}")]
    Invalid { adapter: String, field: String, detail: String },
    #[error("{adapter}: internal error: {detail}")]
    Internal { adapter: String, detail: String },
}

impl AdapterError {
    pub fn retryable(&self) -> bool {
        matches!(self, AdapterError::Timeout { .. } | AdapterError::RateLimited { .. })
    }

    pub fn adapter(&self) -> &str {
        match self {
            AdapterError::NoRoute { adapter }
            | AdapterError::InsufficientLiquidity { adapter }
            | AdapterError::Timeout { adapter, .. }
            | AdapterError::RateLimited { adapter }
            | AdapterError::UnsupportedChain { adapter, .. }
            | AdapterError::UnsupportedToken { adapter, .. }
            | AdapterError::Transport { adapter, .. }
            | AdapterError::Invalid { adapter, .. }
            | AdapterError::Internal { adapter, .. } => adapter,
        }
    }
}

/// Per-request execution context shared across every fanned-out adapter
/// call (§5 concurrency, §9 cancellation design note).
#[derive(Clone)]
pub struct AdapterContext {
    pub deadline: Duration,
    pub cancel: CancellationToken,
}

impl AdapterContext {
    pub fn new(deadline: Duration, cancel: CancellationToken) -> Self {
        Self { deadline, cancel }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub cross_chain: bool,
    pub max_slippage_bps: u16,
    pub supports_exact_out: bool,
    pub priority: i32,
}

/// §4.4 common adapter contract.
#[async_trait]
pub trait RouterAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Fast, no network: whether this adapter can in principle route
    /// `from -> to`, based on registry capabilities.
    fn supports(&self, from: &TokenRef, to: &TokenRef) -> bool;

    async fn quote(&self, request: &RouteRequest, ctx: &AdapterContext) -> Result<crate::types::Route, AdapterError>;

    fn capabilities(&self) -> Capabilities;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timeout_and_rate_limited_are_retryable() {
        assert!(AdapterError::Timeout { adapter: "x".into(), elapsed_ms: 10 }.retryable());
        assert!(AdapterError::RateLimited { adapter: "x".into() }.retryable());
        assert!(!AdapterError::NoRoute { adapter: "x".into() }.retryable());
        assert!(!AdapterError::Transport { adapter: "x".into(), detail: "".into() }.retryable());
    }
}

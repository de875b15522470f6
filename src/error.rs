//! Error taxonomy for the routing core.
//!
//! A tagged union, not an exception hierarchy: every fallible public API
//! returns `Result<T, RouterError>` and recoverable per-source failures
//! never propagate as this type (they are collected as `AdapterError`
//! diagnostics instead - see `crate::adapters::AdapterError`).
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::adapters::AdapterError;
use crate::types::{Route, TokenRef};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RouterError {
    #[error("invalid request: field `{field}` - {reason}")]
    InvalidRequest { field: String, reason: String },

    #[error("unsupported chain: {chain_id}")]
    UnsupportedChain { chain_id: u32 },

    #[error("unsupported token: {token:?}")]
    UnsupportedToken { token: TokenRef },

    #[error("no route found ({} source errors)", source_errors.len())]
    NoRoute { source_errors: Vec<AdapterError> },

    #[error("deadline exceeded after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("route returned but {} source(s) degraded", degraded_sources.len())]
    PartialFailure {
        route: Box<Route>,
        degraded_sources: Vec<AdapterError>,
    },

    #[error("internal invariant violation: {detail}")]
    Internal { detail: String },
}

impl RouterError {
    /// Stable machine-readable code. No internal detail leaks to callers
    /// beyond what's already in the human-readable `Display`.
    pub fn code(&self) -> &'static str {
        match self {
            RouterError::InvalidRequest { .. } => "invalid_request",
            RouterError::UnsupportedChain { .. } => "unsupported_chain",
            RouterError::UnsupportedToken { .. } => "unsupported_token",
            RouterError::NoRoute { .. } => "no_route",
            RouterError::Timeout { .. } => "timeout",
            RouterError::PartialFailure { .. } => "partial_failure",
            RouterError::Internal { .. } => "internal",
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::error!(target: "invariant", detail = %detail, "internal invariant violation");
        RouterError::Internal { detail }
    }
}

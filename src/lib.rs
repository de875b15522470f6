//! Universal swap routing core.
//!
//! Multi-DEX, multi-chain route discovery and quote aggregation: a chain &
//! provider registry (C1), a per-chain liquidity graph (C2), a pathfinder
//! (C3), external router adapters (C4), a quote aggregator (C5), and a
//! cross-chain route builder (C6), wired together by the `Core` value.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

pub mod adapters;
pub mod aggregator;
pub mod bridge;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod graph;
pub mod pathfinder;
pub mod registry;
pub mod types;

pub use config::{load_config, RouterConfig};
pub use core::Core;
pub use error::RouterError;
pub use types::{AmountRaw, CanonicalChainId, ChainAddress, Route, RouteRequest, RouteResponse, RouteStep, SlippagePolicy, TokenRef};

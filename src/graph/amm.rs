//! Constant-product AMM simulation (§4.3.2).
//!
//! Generalizes the teacher's `PriceCalculator` (hardcoded 0.3% fee) to an
//! arbitrary per-edge `feeBps`, since every DEX and fee tier in this core
//! shares one edge type rather than one struct per DEX family.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::types::AmountRaw;
use alloy::primitives::U256;

/// `amountOut = amountInWithFee * Ry / (Rx * 10000 + amountInWithFee)`.
/// Returns zero for degenerate input rather than panicking - the pathfinder
/// treats a zero-output edge as non-executable and skips it (§4.3.4).
pub fn get_amount_out(amount_in: AmountRaw, reserve_in: AmountRaw, reserve_out: AmountRaw, fee_bps: u16) -> AmountRaw {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return AmountRaw::ZERO;
    }
    let fee_bps = fee_bps.min(10_000);
    let amount_in_with_fee = amount_in.0.saturating_mul(U256::from(10_000u32 - fee_bps as u32));
    let numerator = amount_in_with_fee.saturating_mul(reserve_out.0);
    let denominator = reserve_in
        .0
        .saturating_mul(U256::from(10_000u32))
        .saturating_add(amount_in_with_fee);
    if denominator.is_zero() {
        return AmountRaw::ZERO;
    }
    AmountRaw::new(numerator / denominator)
}

/// Inverse of `get_amount_out`: the input required to receive `amount_out`.
/// Returns `None` when `amount_out >= reserve_out` (insufficient liquidity).
pub fn get_amount_in(
    amount_out: AmountRaw,
    reserve_in: AmountRaw,
    reserve_out: AmountRaw,
    fee_bps: u16,
) -> Option<AmountRaw> {
    if amount_out.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return Some(AmountRaw::ZERO);
    }
    if amount_out.0 >= reserve_out.0 {
        return None;
    }
    let fee_bps = fee_bps.min(10_000);
    let numerator = reserve_in
        .0
        .saturating_mul(amount_out.0)
        .saturating_mul(U256::from(10_000u32));
    let denominator = (reserve_out.0 - amount_out.0).saturating_mul(U256::from(10_000u32 - fee_bps as u32));
    if denominator.is_zero() {
        return None;
    }
    Some(AmountRaw::new(numerator / denominator + U256::from(1u32)))
}

/// `edgePriceImpact = amountIn / Rx`, as a ratio (not bps). Caller multiplies
/// by 10_000 for a bps figure.
pub fn edge_price_impact(amount_in: AmountRaw, reserve_in: AmountRaw) -> f64 {
    if reserve_in.is_zero() {
        return 1.0;
    }
    ratio(amount_in.0, reserve_in.0)
}

/// Path price impact compounds per-edge impacts: `1 - Π(1 - impact_i)`
/// (Open Question #2, SPEC_FULL.md: compounded, not summed).
pub fn compound_price_impact(edge_impacts: &[f64]) -> f64 {
    let mut retained = 1.0;
    for impact in edge_impacts {
        retained *= 1.0 - impact.clamp(0.0, 1.0);
    }
    1.0 - retained
}

/// True when the trade would drain more than 30% of the input-side reserve
/// (§4.3.4: such an edge is non-executable and must be skipped).
pub fn drains_reserve_excessively(amount_in: AmountRaw, reserve_in: AmountRaw) -> bool {
    edge_price_impact(amount_in, reserve_in) > 0.30
}

/// `U256` ratio as `f64`, saturating toward 1.0 for values that would
/// overflow `f64`'s useful range rather than producing `inf`/`NaN`.
fn ratio(numerator: U256, denominator: U256) -> f64 {
    if denominator.is_zero() {
        return 1.0;
    }
    // U256 doesn't losslessly convert to f64 in general; for the ratios we
    // care about (a single swap's worth of input over its own reserve) both
    // operands fit comfortably in f64's 53-bit mantissa after truncating to
    // u128, which covers any realistic token supply.
    let n: u128 = numerator.try_into().unwrap_or(u128::MAX);
    let d: u128 = denominator.try_into().unwrap_or(u128::MAX);
    if d == 0 {
        return 1.0;
    }
    (n as f64 / d as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(v: u64) -> AmountRaw {
        AmountRaw::new(U256::from(v))
    }

    #[test]
    fn amount_out_matches_s1_scenario() {
        // WETH/USDC, reserves (1000e18, 2_000_000e6), fee 30bps, amountIn 1e18.
        // Scaled down to avoid U256 overflow concerns while preserving ratios:
        // reserve_in = 1000, reserve_out = 2_000_000, amount_in = 1.
        let out = get_amount_out(amt(1), amt(1000), amt(2_000_000), 30);
        // amountInWithFee = 9970; numerator = 9970*2_000_000 = 19_940_000_000
        // denom = 1000*10000+9970 = 10_009_970; 19_940_000_000 / 10_009_970 = 1992
        assert_eq!(out.0, U256::from(1992u64));
    }

    #[test]
    fn no_free_arbitrage_within_a_pool() {
        let reserve_in = amt(1_000_000);
        let reserve_out = amt(2_000_000);
        let amount_in = amt(1_000);
        let out = get_amount_out(amount_in, reserve_in, reserve_out, 30);
        assert!(out.0 > U256::ZERO && out.0 < reserve_out.0);

        // Swap back against the resulting reserves.
        let new_reserve_in = AmountRaw::new(reserve_in.0 + amount_in.0);
        let new_reserve_out = AmountRaw::new(reserve_out.0 - out.0);
        let back = get_amount_out(out, new_reserve_out, new_reserve_in, 30);
        assert!(back.0 <= amount_in.0);
    }

    #[test]
    fn compounded_impact_matches_manual_product() {
        let impact = compound_price_impact(&[0.01, 0.02]);
        let expected = 1.0 - (0.99 * 0.98);
        assert!((impact - expected).abs() < 1e-12);
    }

    #[test]
    fn excessive_drain_detected_at_30_percent() {
        assert!(drains_reserve_excessively(amt(301), amt(1000)));
        assert!(!drains_reserve_excessively(amt(300), amt(1000)));
    }

    proptest::proptest! {
        #[test]
        fn no_free_arbitrage_for_arbitrary_reserves(
            reserve_in in 1_000u64..1_000_000_000u64,
            reserve_out in 1_000u64..1_000_000_000u64,
            amount_in in 1u64..1_000_000u64,
            fee_bps in 0u16..=1_000u16,
        ) {
            let out = get_amount_out(amt(amount_in), amt(reserve_in), amt(reserve_out), fee_bps);
            prop_assert!(out.0 < amt(reserve_out).0);

            let new_reserve_in = amt(reserve_in).0 + amt(amount_in).0;
            let new_reserve_out = amt(reserve_out).0 - out.0;
            let back = get_amount_out(out, AmountRaw::new(new_reserve_out), AmountRaw::new(new_reserve_in), fee_bps);
            prop_assert!(back.0 <= amt(amount_in).0);
        }
    }
}

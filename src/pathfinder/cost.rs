//! Edge cost function for Dijkstra search (§4.3.2).
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::graph::amm;
use crate::types::AmountRaw;

/// Weight on price impact in the cost function. Tuned so a 1% impact costs
/// about as much as halving the output via the log term.
pub const GAMMA: f64 = 2.0;
/// Weight on gas-as-fraction-of-input.
pub const DELTA: f64 = 1.0;

/// `-log(amountOut/amountIn) + gamma*edgePriceImpact + delta*gasEdgeUsd/inputUsd`.
/// Lower cost means better; the log transform makes multi-hop costs additive
/// so Dijkstra's relaxation is correct (§4.3.2).
pub fn edge_cost(amount_in: AmountRaw, amount_out: AmountRaw, reserve_in: AmountRaw, gas_edge_usd: f64, input_usd: f64) -> f64 {
    if amount_out.is_zero() || amount_in.is_zero() {
        return f64::INFINITY;
    }
    let ratio = u256_ratio(amount_out, amount_in);
    if ratio <= 0.0 {
        return f64::INFINITY;
    }
    let impact = amm::edge_price_impact(amount_in, reserve_in);
    let gas_term = if input_usd > 0.0 { gas_edge_usd / input_usd } else { 0.0 };
    -ratio.ln() + GAMMA * impact + DELTA * gas_term
}

fn u256_ratio(amount_out: AmountRaw, amount_in: AmountRaw) -> f64 {
    let out: u128 = amount_out.0.try_into().unwrap_or(u128::MAX);
    let inp: u128 = amount_in.0.try_into().unwrap_or(1);
    if inp == 0 {
        return 0.0;
    }
    out as f64 / inp as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn amt(v: u64) -> AmountRaw {
        AmountRaw::new(U256::from(v))
    }

    #[test]
    fn higher_output_per_input_yields_lower_cost() {
        let cheap = edge_cost(amt(1000), amt(990), amt(1_000_000), 0.0, 1000.0);
        let expensive = edge_cost(amt(1000), amt(500), amt(1_000_000), 0.0, 1000.0);
        assert!(cheap < expensive);
    }

    #[test]
    fn zero_output_is_infinite_cost() {
        let cost = edge_cost(amt(1000), AmountRaw::ZERO, amt(1_000_000), 0.0, 1000.0);
        assert_eq!(cost, f64::INFINITY);
    }

    #[test]
    fn gas_and_impact_increase_cost() {
        let base = edge_cost(amt(1000), amt(990), amt(1_000_000), 0.0, 1000.0);
        let with_gas = edge_cost(amt(1000), amt(990), amt(1_000_000), 5.0, 1000.0);
        assert!(with_gas > base);
    }
}

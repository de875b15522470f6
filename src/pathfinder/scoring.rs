//! Route scoring and determinism tie-breaks (§4.3.3).
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use super::search::PathCandidate;
use std::cmp::Ordering;

/// `score = outputAmountUsd - gasCostUsd - priceImpactRatio*inputAmountUsd - protocolFeesUsd`.
pub fn score(output_amount_usd: f64, gas_cost_usd: f64, price_impact_ratio: f64, input_amount_usd: f64, protocol_fees_usd: f64) -> f64 {
    output_amount_usd - gas_cost_usd - price_impact_ratio * input_amount_usd - protocol_fees_usd
}

/// Orders candidates for the final sort inside `find_paths`: fewer hops
/// first, then higher minimum edge liquidity, then lexicographically
/// smaller edge-id path for determinism. This runs ahead of the
/// dollar-denominated `score` (which the aggregator applies across sources,
/// not within one pathfinder call) and only matters among paths with
/// otherwise-equal standing.
pub fn tie_break_order(a: &PathCandidate, b: &PathCandidate) -> Ordering {
    // Primary: higher amount_out wins (more output for the same input).
    let out_a: u128 = a.amount_out.0.try_into().unwrap_or(0);
    let out_b: u128 = b.amount_out.0.try_into().unwrap_or(0);
    out_b
        .cmp(&out_a)
        .then_with(|| a.hop_count().cmp(&b.hop_count()))
        .then_with(|| {
            b.min_edge_liquidity_usd
                .partial_cmp(&a.min_edge_liquidity_usd)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.path_key().cmp(&b.path_key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinder::search::PathStep;
    use crate::types::{AmountRaw, CanonicalChainId, ChainAddress, TokenRef};
    use alloy::primitives::{Address, U256};

    fn token(byte: u8) -> TokenRef {
        TokenRef::new(CanonicalChainId(1), ChainAddress::Evm(Address::repeat_byte(byte)))
    }

    fn candidate(edge_id: &str, hops: usize, amount_out: u64, min_liquidity: f64) -> PathCandidate {
        let steps = (0..hops)
            .map(|i| PathStep {
                edge_id: format!("{edge_id}{i}"),
                dex: "uniswap".into(),
                token_in: token(i as u8),
                token_out: token(i as u8 + 1),
                amount_in: AmountRaw::new(U256::from(1u64)),
                amount_out: AmountRaw::new(U256::from(amount_out)),
                fee_bps: 30,
            })
            .collect();
        PathCandidate {
            steps,
            amount_out: AmountRaw::new(U256::from(amount_out)),
            price_impact_ratio: 0.01,
            min_edge_liquidity_usd: min_liquidity,
        }
    }

    #[test]
    fn score_penalizes_gas_impact_and_fees() {
        let s = score(1000.0, 5.0, 0.01, 1000.0, 2.0);
        assert!((s - (1000.0 - 5.0 - 10.0 - 2.0)).abs() < 1e-9);
    }

    #[test]
    fn fewer_hops_breaks_tie_on_equal_output() {
        let direct = candidate("a", 1, 990, 500_000.0);
        let two_hop = candidate("b", 2, 990, 500_000.0);
        let mut candidates = vec![two_hop.clone(), direct.clone()];
        candidates.sort_by(tie_break_order);
        assert_eq!(candidates[0].hop_count(), 1);
    }

    #[test]
    fn higher_min_liquidity_breaks_tie_on_equal_hops_and_output() {
        let low = candidate("a", 1, 990, 100_000.0);
        let high = candidate("b", 1, 990, 900_000.0);
        let mut candidates = vec![low.clone(), high.clone()];
        candidates.sort_by(tie_break_order);
        assert_eq!(candidates[0].min_edge_liquidity_usd, 900_000.0);
    }
}

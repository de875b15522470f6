//! Liquidity pool edges and their invariants (§3.3).
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::types::{AmountRaw, CanonicalChainId, TokenRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEdge {
    pub id: String,
    pub chain: CanonicalChainId,
    pub token_a: TokenRef,
    pub token_b: TokenRef,
    pub dex: String,
    pub factory: Option<String>,
    pub pair_address: String,
    pub reserves: (AmountRaw, AmountRaw),
    pub fee_bps: u16,
    pub liquidity_usd: f64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EdgeInvariantError {
    #[error("tokens not canonically ordered (tokenA must be < tokenB)")]
    NotCanonicallyOrdered,
    #[error("non-positive reserve")]
    NonPositiveReserve,
    #[error("fee_bps {0} out of range [0, 10000]")]
    FeeOutOfRange(u16),
    #[error("edge chain does not match both token chains")]
    ChainMismatch,
    #[error("last_updated went backwards for this edge")]
    TimeWentBackwards,
}

impl PoolEdge {
    /// Builds an edge, silently flipping token order/reserves into canonical
    /// orientation (`tokenA < tokenB`) rather than rejecting legitimately
    /// reversed input from a data source.
    pub fn new_canonical(
        id: String,
        chain: CanonicalChainId,
        token0: TokenRef,
        token1: TokenRef,
        dex: String,
        factory: Option<String>,
        pair_address: String,
        reserve0: AmountRaw,
        reserve1: AmountRaw,
        fee_bps: u16,
        liquidity_usd: f64,
        last_updated: DateTime<Utc>,
    ) -> Result<Self, EdgeInvariantError> {
        let (token_a, token_b, reserves) = if token0.address <= token1.address {
            (token0, token1, (reserve0, reserve1))
        } else {
            (token1, token0, (reserve1, reserve0))
        };

        let edge = PoolEdge {
            id,
            chain,
            token_a,
            token_b,
            dex,
            factory,
            pair_address,
            reserves,
            fee_bps,
            liquidity_usd,
            last_updated,
        };
        edge.validate(None)?;
        Ok(edge)
    }

    /// Validates all five §3.3 edge invariants. Pass the previous version of
    /// this edge (if any) to also check the monotonic-timestamp invariant.
    pub fn validate(&self, previous: Option<&PoolEdge>) -> Result<(), EdgeInvariantError> {
        if self.token_a.address > self.token_b.address {
            return Err(EdgeInvariantError::NotCanonicallyOrdered);
        }
        if self.reserves.0.is_zero() || self.reserves.1.is_zero() {
            return Err(EdgeInvariantError::NonPositiveReserve);
        }
        if self.fee_bps > 10_000 {
            return Err(EdgeInvariantError::FeeOutOfRange(self.fee_bps));
        }
        if self.chain != self.token_a.chain || self.chain != self.token_b.chain {
            return Err(EdgeInvariantError::ChainMismatch);
        }
        if let Some(prev) = previous {
            if self.last_updated < prev.last_updated {
                return Err(EdgeInvariantError::TimeWentBackwards);
            }
        }
        Ok(())
    }

    pub fn other_token<'a>(&'a self, token: &TokenRef) -> Option<&'a TokenRef> {
        if &self.token_a == token {
            Some(&self.token_b)
        } else if &self.token_b == token {
            Some(&self.token_a)
        } else {
            None
        }
    }

    /// Reserves `(reserve_in, reserve_out)` oriented for a swap starting at
    /// `token_in`.
    pub fn oriented_reserves(&self, token_in: &TokenRef) -> Option<(AmountRaw, AmountRaw)> {
        if &self.token_a == token_in {
            Some((self.reserves.0, self.reserves.1))
        } else if &self.token_b == token_in {
            Some((self.reserves.1, self.reserves.0))
        } else {
            None
        }
    }
}

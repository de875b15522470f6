//! Relay adapter: bridge-only, used exclusively as the cross-chain leg
//! inside the Cross-Chain Route Builder (C6, §4.6). Never called directly
//! by the aggregator's same-chain fan-out since `supports` always requires
//! two distinct chains.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use super::{AdapterContext, AdapterError, Capabilities, RouterAdapter};
use crate::types::{AmountRaw, Route, RouteStep, RouteRequest, SlippagePolicy, TokenRef};
use alloy::primitives::U256;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

pub struct RelayAdapter {
    priority: i32,
    fee_bps: u16,
    estimated_seconds: u32,
}

impl RelayAdapter {
    pub fn new() -> Self {
        Self {
            priority: 5,
            fee_bps: 10,
            estimated_seconds: 45,
        }
    }
}

impl Default for RelayAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouterAdapter for RelayAdapter {
    fn name(&self) -> &str {
        "relay"
    }

    fn supports(&self, from: &TokenRef, to: &TokenRef) -> bool {
        from.chain != to.chain
    }

    async fn quote(&self, request: &RouteRequest, ctx: &AdapterContext) -> Result<Route, AdapterError> {
        if ctx.cancel.is_cancelled() {
            return Err(AdapterError::Timeout {
                adapter: self.name().into(),
                elapsed_ms: ctx.deadline.as_millis() as u64,
            });
        }
        if !self.supports(&request.from, &request.to) {
            return Err(AdapterError::Invalid {
                adapter: self.name().into(),
                field: "from/to".into(),
                detail: "relay only bridges across distinct chains".into(),
            });
        }
        if request.amount_in.is_zero() {
            return Err(AdapterError::Invalid {
                adapter: self.name().into(),
                field: "amount_in".into(),
                detail: "must be positive".into(),
            });
        }

        let fee_multiplier = U256::from(10_000u32 - self.fee_bps as u32);
        let amount_out = AmountRaw::new(request.amount_in.0.saturating_mul(fee_multiplier) / U256::from(10_000u32));
        let bps = request.slippage.ceiling_bps();
        let amount_out_min = amount_out.apply_slippage_floor(bps);

        let step = RouteStep::Bridge {
            from_chain: request.from.chain,
            to_chain: request.to.chain,
            from_token: request.from.clone(),
            to_token: request.to.clone(),
            bridge_id: "relay".into(),
            amount_in: request.amount_in,
            amount_out_quoted: amount_out,
            fees_usd: Decimal::new(150, 2),
            estimated_seconds: self.estimated_seconds,
        };

        Ok(Route {
            id: Uuid::new_v4().to_string(),
            source: self.name().to_string(),
            steps: vec![step],
            amount_in: request.amount_in,
            amount_out_quoted: amount_out,
            amount_out_min,
            price_impact_bps: 10,
            gas_estimate_usd: Decimal::new(300, 2),
            total_fees_usd: Decimal::new(150, 2),
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(self.estimated_seconds as i64),
            slippage_clamped_at: match request.slippage {
                SlippagePolicy::Auto { max_bps } => Some(max_bps),
                SlippagePolicy::Fixed { .. } => None,
            },
            requires_exact_simulation: false,
        })
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            cross_chain: true,
            max_slippage_bps: 300,
            supports_exact_out: false,
            priority: self.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanonicalChainId, ChainAddress};
    use alloy::primitives::Address;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn token(chain: u32, byte: u8) -> TokenRef {
        TokenRef::new(CanonicalChainId(chain), ChainAddress::Evm(Address::repeat_byte(byte)))
    }

    #[tokio::test]
    async fn bridges_across_distinct_chains() {
        let adapter = RelayAdapter::new();
        let request = RouteRequest {
            from: token(1, 1),
            to: token(10, 1),
            amount_in: AmountRaw::new(U256::from(1_000_000u64)),
            slippage: SlippagePolicy::Fixed { bps: 50 },
            deadline: Duration::from_secs(5),
            recipient: None,
        };
        let ctx = AdapterContext::new(Duration::from_secs(5), CancellationToken::new());
        let route = adapter.quote(&request, &ctx).await.unwrap();
        assert!(matches!(route.steps[0], RouteStep::Bridge { .. }));
    }

    #[tokio::test]
    async fn rejects_same_chain_request() {
        let adapter = RelayAdapter::new();
        let request = RouteRequest {
            from: token(1, 1),
            to: token(1, 2),
            amount_in: AmountRaw::new(U256::from(1_000_000u64)),
            slippage: SlippagePolicy::Fixed { bps: 50 },
            deadline: Duration::from_secs(5),
            recipient: None,
        };
        let ctx = AdapterContext::new(Duration::from_secs(5), CancellationToken::new());
        let err = adapter.quote(&request, &ctx).await.unwrap_err();
        assert!(matches!(err, AdapterError::Invalid { .. }));
    }
}

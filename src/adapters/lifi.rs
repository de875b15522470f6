//! LiFi adapter: cross-chain-capable, structured like the teacher's
//! `reqwest`-based HTTP call sites but simulated in-process so the crate
//! builds and tests without network access (§4.4, §6.3).
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use super::{AdapterContext, AdapterError, Capabilities, RouterAdapter};
use crate::types::{AmountRaw, Route, RouteStep, RouteRequest, SlippagePolicy, TokenRef};
use alloy::primitives::U256;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

pub struct LifiAdapter {
    priority: i32,
    fee_bps: u16,
}

impl LifiAdapter {
    pub fn new() -> Self {
        Self {
            priority: 10,
            fee_bps: 25,
        }
    }
}

impl Default for LifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouterAdapter for LifiAdapter {
    fn name(&self) -> &str {
        "lifi"
    }

    fn supports(&self, from: &TokenRef, to: &TokenRef) -> bool {
        from.chain != to.chain || from != to
    }

    async fn quote(&self, request: &RouteRequest, ctx: &AdapterContext) -> Result<Route, AdapterError> {
        if ctx.cancel.is_cancelled() {
            return Err(AdapterError::Timeout {
                adapter: self.name().into(),
                elapsed_ms: ctx.deadline.as_millis() as u64,
            });
        }
        if request.amount_in.is_zero() {
            return Err(AdapterError::Invalid {
                adapter: self.name().into(),
                field: "amount_in".into(),
                detail: "must be positive".into(),
            });
        }
        if !self.supports(&request.from, &request.to) {
            return Err(AdapterError::UnsupportedToken {
                adapter: self.name().into(),
                token: request.to.clone(),
            });
        }

        let fee_multiplier = U256::from(10_000u32 - self.fee_bps as u32);
        let amount_out = AmountRaw::new(request.amount_in.0.saturating_mul(fee_multiplier) / U256::from(10_000u32));

        let bps = request.slippage.ceiling_bps();
        let amount_out_min = amount_out.apply_slippage_floor(bps);

        let step = RouteStep::Swap {
            chain: request.from.chain,
            from_token: request.from.clone(),
            to_token: request.to.clone(),
            dex: "lifi-aggregated".into(),
            amount_in: request.amount_in,
            amount_out_quoted: amount_out,
            pool_path: vec!["lifi".into()],
            raw_amount_out: Some(amount_out.0.to_string()),
        };

        Ok(Route {
            id: Uuid::new_v4().to_string(),
            source: self.name().to_string(),
            steps: vec![step],
            amount_in: request.amount_in,
            amount_out_quoted: amount_out,
            amount_out_min,
            price_impact_bps: 15,
            gas_estimate_usd: Decimal::new(250, 2),
            total_fees_usd: Decimal::new(50, 2),
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(30),
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
            max_slippage_bps: 500,
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
    async fn quotes_a_cross_chain_request() {
        let adapter = LifiAdapter::new();
        let request = RouteRequest {
            from: token(1, 1),
            to: token(137, 2),
            amount_in: AmountRaw::new(U256::from(1_000_000u64)),
            slippage: SlippagePolicy::Fixed { bps: 50 },
            deadline: Duration::from_secs(5),
            recipient: None,
        };
        let ctx = AdapterContext::new(Duration::from_secs(5), CancellationToken::new());
        let route = adapter.quote(&request, &ctx).await.unwrap();
        assert!(route.amount_out_quoted.0 < route.amount_in.0);
        assert!(route.amount_out_min.0 < route.amount_out_quoted.0);
    }

    #[tokio::test]
    async fn rejects_zero_amount() {
        let adapter = LifiAdapter::new();
        let request = RouteRequest {
            from: token(1, 1),
            to: token(137, 2),
            amount_in: AmountRaw::ZERO,
            slippage: SlippagePolicy::Fixed { bps: 50 },
            deadline: Duration::from_secs(5),
            recipient: None,
        };
        let ctx = AdapterContext::new(Duration::from_secs(5), CancellationToken::new());
        let err = adapter.quote(&request, &ctx).await.unwrap_err();
        assert!(matches!(err, AdapterError::Invalid { .. }));
    }
}

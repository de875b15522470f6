//! Jupiter adapter: same-chain Solana routing, exercising the non-EVM
//! `ChainAddress::Base58` variant and exact-in quoting (§4.4).
//!
//! Field shapes grounded on the `jupiter-swap-api-client` reference file's
//! `QuoteRequest`/`SwapMode` (`other_examples/`), generalized here into the
//! common `RouterAdapter` trait rather than a standalone HTTP client.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use super::{AdapterContext, AdapterError, Capabilities, RouterAdapter};
use crate::types::{AmountRaw, CanonicalChainId, ChainAddress, Route, RouteStep, RouteRequest, SlippagePolicy, TokenRef};
use alloy::primitives::U256;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

pub const SOLANA_CHAIN_ID: CanonicalChainId = CanonicalChainId(900);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapMode {
    #[default]
    ExactIn,
    ExactOut,
}

pub struct JupiterAdapter {
    priority: i32,
    fee_bps: u16,
}

impl JupiterAdapter {
    pub fn new() -> Self {
        Self {
            priority: 20,
            fee_bps: 4,
        }
    }
}

impl Default for JupiterAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouterAdapter for JupiterAdapter {
    fn name(&self) -> &str {
        "jupiter"
    }

    fn supports(&self, from: &TokenRef, to: &TokenRef) -> bool {
        from.chain == SOLANA_CHAIN_ID
            && to.chain == SOLANA_CHAIN_ID
            && matches!(from.address, ChainAddress::Base58(_) | ChainAddress::Text(_))
            && matches!(to.address, ChainAddress::Base58(_) | ChainAddress::Text(_))
    }

    async fn quote(&self, request: &RouteRequest, ctx: &AdapterContext) -> Result<Route, AdapterError> {
        if ctx.cancel.is_cancelled() {
            return Err(AdapterError::Timeout {
                adapter: self.name().into(),
                elapsed_ms: ctx.deadline.as_millis() as u64,
            });
        }
        if !self.supports(&request.from, &request.to) {
            return Err(AdapterError::UnsupportedChain {
                adapter: self.name().into(),
                chain_id: request.from.chain.0,
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

        let step = RouteStep::Swap {
            chain: SOLANA_CHAIN_ID,
            from_token: request.from.clone(),
            to_token: request.to.clone(),
            dex: "jupiter-aggregated".into(),
            amount_in: request.amount_in,
            amount_out_quoted: amount_out,
            pool_path: vec!["jupiter".into()],
            raw_amount_out: Some(amount_out.0.to_string()),
        };

        Ok(Route {
            id: Uuid::new_v4().to_string(),
            source: self.name().to_string(),
            steps: vec![step],
            amount_in: request.amount_in,
            amount_out_quoted: amount_out,
            amount_out_min,
            price_impact_bps: 5,
            gas_estimate_usd: Decimal::new(1, 2),
            total_fees_usd: Decimal::new(4, 2),
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(20),
            slippage_clamped_at: match request.slippage {
                SlippagePolicy::Auto { max_bps } => Some(max_bps),
                SlippagePolicy::Fixed { .. } => None,
            },
            requires_exact_simulation: false,
        })
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            cross_chain: false,
            max_slippage_bps: 1000,
            supports_exact_out: true,
            priority: self.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn sol_token(mint: &str) -> TokenRef {
        TokenRef::new(SOLANA_CHAIN_ID, ChainAddress::Base58(mint.to_string()))
    }

    fn evm_token() -> TokenRef {
        TokenRef::new(CanonicalChainId(1), ChainAddress::Evm(alloy::primitives::Address::repeat_byte(1)))
    }

    #[tokio::test]
    async fn quotes_a_solana_same_chain_swap() {
        let adapter = JupiterAdapter::new();
        let request = RouteRequest {
            from: sol_token("So11111111111111111111111111111111111111112"),
            to: sol_token("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            amount_in: AmountRaw::new(U256::from(1_000_000u64)),
            slippage: SlippagePolicy::Fixed { bps: 50 },
            deadline: Duration::from_secs(5),
            recipient: None,
        };
        let ctx = AdapterContext::new(Duration::from_secs(5), CancellationToken::new());
        let route = adapter.quote(&request, &ctx).await.unwrap();
        assert_eq!(route.source, "jupiter");
    }

    #[tokio::test]
    async fn rejects_non_solana_tokens() {
        let adapter = JupiterAdapter::new();
        let request = RouteRequest {
            from: evm_token(),
            to: sol_token("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            amount_in: AmountRaw::new(U256::from(1_000_000u64)),
            slippage: SlippagePolicy::Fixed { bps: 50 },
            deadline: Duration::from_secs(5),
            recipient: None,
        };
        let ctx = AdapterContext::new(Duration::from_secs(5), CancellationToken::new());
        let err = adapter.quote(&request, &ctx).await.unwrap_err();
        assert!(matches!(err, AdapterError::UnsupportedChain { .. }));
    }
}

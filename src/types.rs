//! Shared data model for the routing core.
//!
//! Canonical identifiers (`CanonicalChainId`, `TokenRef`, `AmountRaw`) and
//! quote entities (`RouteRequest`, `Route`, `RouteStep`) used across every
//! component. Amounts are raw integers in the token's smallest unit and are
//! never formatted for display here - that's the caller's job.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Process-wide stable positive integer assigned in the registry. Never
/// derived by hashing a chain's native identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalChainId(pub u32);

impl fmt::Display for CanonicalChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chain-appropriate opaque byte string identifying a token on its chain.
/// EVM addresses compare byte-exact (alloy's `Address` is already
/// case-insensitive - it stores decoded bytes, not the checksummed string).
/// Non-EVM addresses (Solana base58 mint, Cosmos bech32 denom) are kept as
/// their canonical string form and compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChainAddress {
    Evm(Address),
    /// Solana base58-encoded 32-byte public key, kept as the canonical string.
    Base58(String),
    /// Cosmos-style bech32 denom or any other chain-native textual address.
    Text(String),
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainAddress::Evm(a) => write!(f, "{a}"),
            ChainAddress::Base58(s) | ChainAddress::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Sentinel denoting a chain's native currency rather than an ERC20/SPL/denom.
pub const NATIVE: &str = "native";

/// The pair `(canonical chain id, address)` that uniquely identifies a token
/// inside the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRef {
    pub chain: CanonicalChainId,
    pub address: ChainAddress,
}

impl TokenRef {
    pub fn new(chain: CanonicalChainId, address: ChainAddress) -> Self {
        Self { chain, address }
    }

    pub fn native(chain: CanonicalChainId) -> Self {
        Self {
            chain,
            address: ChainAddress::Text(NATIVE.to_string()),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(&self.address, ChainAddress::Text(s) if s == NATIVE)
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.address)
    }
}

/// An unsigned big-integer in the token's smallest unit. Never formatted for
/// display inside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountRaw(#[serde(with = "u256_decimal_str")] pub U256);

mod u256_decimal_str {
    use alloy::primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &U256, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl AmountRaw {
    pub const ZERO: AmountRaw = AmountRaw(U256::ZERO);

    pub fn new(v: U256) -> Self {
        Self(v)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Truncating multiply-then-divide by `(10000 - bps) / 10000`, used for
    /// `amountOutMin` per the §3.4 chaining invariant.
    pub fn apply_slippage_floor(&self, bps: u16) -> AmountRaw {
        let bps = bps.min(10_000);
        let keep = U256::from(10_000u32 - bps as u32);
        AmountRaw(self.0.saturating_mul(keep) / U256::from(10_000u32))
    }
}

impl fmt::Display for AmountRaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller's tolerance for adverse difference between quoted and executed
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SlippagePolicy {
    Fixed { bps: u16 },
    Auto { max_bps: u16 },
}

impl SlippagePolicy {
    /// The effective bps ceiling for this request. `Auto` sources may pick
    /// their own smaller value; the aggregator clamps anything larger down
    /// to this (§4.5, §8.3 S6).
    pub fn ceiling_bps(&self) -> u16 {
        match self {
            SlippagePolicy::Fixed { bps } => *bps,
            SlippagePolicy::Auto { max_bps } => *max_bps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub from: TokenRef,
    pub to: TokenRef,
    pub amount_in: AmountRaw,
    pub slippage: SlippagePolicy,
    #[serde(with = "duration_ms")]
    pub deadline: Duration,
    pub recipient: Option<ChainAddress>,
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// One hop inside a route's execution plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RouteStep {
    Swap {
        chain: CanonicalChainId,
        from_token: TokenRef,
        to_token: TokenRef,
        dex: String,
        amount_in: AmountRaw,
        amount_out_quoted: AmountRaw,
        pool_path: Vec<String>,
        /// The provider's raw output integer, recorded verbatim so the
        /// executor can reproduce exactly what the provider's router
        /// expects (§4.4 normalization duty 4, §6.3).
        raw_amount_out: Option<String>,
    },
    Bridge {
        from_chain: CanonicalChainId,
        to_chain: CanonicalChainId,
        from_token: TokenRef,
        to_token: TokenRef,
        bridge_id: String,
        amount_in: AmountRaw,
        amount_out_quoted: AmountRaw,
        fees_usd: Decimal,
        estimated_seconds: u32,
    },
    Unwrap {
        chain: CanonicalChainId,
        token: TokenRef,
    },
    Wrap {
        chain: CanonicalChainId,
        token: TokenRef,
    },
}

impl RouteStep {
    pub fn input_token(&self) -> &TokenRef {
        match self {
            RouteStep::Swap { from_token, .. } => from_token,
            RouteStep::Bridge { from_token, .. } => from_token,
            RouteStep::Unwrap { token, .. } => token,
            RouteStep::Wrap { token, .. } => token,
        }
    }

    pub fn output_token(&self) -> &TokenRef {
        match self {
            RouteStep::Swap { to_token, .. } => to_token,
            RouteStep::Bridge { to_token, .. } => to_token,
            RouteStep::Unwrap { token, .. } => token,
            RouteStep::Wrap { token, .. } => token,
        }
    }

    pub fn amount_in(&self) -> AmountRaw {
        match self {
            RouteStep::Swap { amount_in, .. } => *amount_in,
            RouteStep::Bridge { amount_in, .. } => *amount_in,
            RouteStep::Unwrap { .. } | RouteStep::Wrap { .. } => AmountRaw::ZERO,
        }
    }

    pub fn amount_out_quoted(&self) -> AmountRaw {
        match self {
            RouteStep::Swap {
                amount_out_quoted, ..
            } => *amount_out_quoted,
            RouteStep::Bridge {
                amount_out_quoted, ..
            } => *amount_out_quoted,
            RouteStep::Unwrap { .. } | RouteStep::Wrap { .. } => AmountRaw::ZERO,
        }
    }
}

/// An immutable, ranked candidate produced per request. Never stored by the
/// core (§3.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub source: String,
    pub steps: Vec<RouteStep>,
    pub amount_in: AmountRaw,
    pub amount_out_quoted: AmountRaw,
    pub amount_out_min: AmountRaw,
    pub price_impact_bps: u32,
    pub gas_estimate_usd: Decimal,
    pub total_fees_usd: Decimal,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// Set when an `Auto` slippage request's effective bps was clamped down
    /// from a source's own preference (§8.3 S6).
    pub slippage_clamped_at: Option<u16>,
    /// True when the route touches a token the pathfinder cannot simulate
    /// exactly (fee-on-transfer reserves treated as authoritative, §4.3.4).
    pub requires_exact_simulation: bool,
}

impl Route {
    /// §3.4 invariants 1-2: at least one step, and each consecutive pair
    /// chains token-for-token with pre-slippage amounts.
    pub fn validate_chaining(&self) -> Result<(), String> {
        if self.steps.is_empty() {
            return Err("route has zero steps".to_string());
        }
        for pair in self.steps.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.output_token() != b.input_token() {
                return Err(format!(
                    "chaining broken: {} output token != {} input token",
                    a.output_token(),
                    b.input_token()
                ));
            }
            if b.amount_in() != a.amount_out_quoted() {
                return Err(format!(
                    "chaining broken: step amount_in {} != previous amount_out_quoted {}",
                    b.amount_in(),
                    a.amount_out_quoted()
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteResponse {
    pub best: Option<Route>,
    pub alternatives: Vec<Route>,
    pub diagnostics: Vec<crate::adapters::AdapterError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_slippage_floor_truncates() {
        let out = AmountRaw::new(U256::from(1_993_000_000u64));
        let min = out.apply_slippage_floor(50); // 0.5%
        assert_eq!(min.0, U256::from(1_983_035_000u64));
    }

    proptest::proptest! {
        #[test]
        fn slippage_floor_stays_within_bounds(raw in 1u128..(1u128 << 100), bps in 0u16..=10_000u16) {
            let out = AmountRaw::new(U256::from(raw));
            let min = out.apply_slippage_floor(bps);
            // §8.1 invariant 2: amountOutMin <= amountOutQuoted.
            prop_assert!(min.0 <= out.0);
            // ...and >= amountOutQuoted * (10000 - bps) / 10000, exactly, since
            // apply_slippage_floor computes that product directly (no extra
            // rounding beyond the single truncating division).
            let expected_floor = out.0.saturating_mul(U256::from(10_000u32 - bps as u32)) / U256::from(10_000u32);
            prop_assert_eq!(min.0, expected_floor);
        }
    }

    #[test]
    fn chaining_validates_token_and_amount() {
        let chain = CanonicalChainId(1);
        let weth = TokenRef::new(chain, ChainAddress::Evm(Address::repeat_byte(1)));
        let usdc = TokenRef::new(chain, ChainAddress::Evm(Address::repeat_byte(2)));
        let steps = vec![RouteStep::Swap {
            chain,
            from_token: weth.clone(),
            to_token: usdc.clone(),
            dex: "uniswap".into(),
            amount_in: AmountRaw::new(U256::from(1u64)),
            amount_out_quoted: AmountRaw::new(U256::from(100u64)),
            pool_path: vec!["0xabc".into()],
            raw_amount_out: None,
        }];
        let route = Route {
            id: "r1".into(),
            source: "pathfinder".into(),
            steps,
            amount_in: AmountRaw::new(U256::from(1u64)),
            amount_out_quoted: AmountRaw::new(U256::from(100u64)),
            amount_out_min: AmountRaw::new(U256::from(99u64)),
            price_impact_bps: 10,
            gas_estimate_usd: Decimal::new(1, 1),
            total_fees_usd: Decimal::ZERO,
            expires_at: chrono::Utc::now(),
            slippage_clamped_at: None,
            requires_exact_simulation: false,
        };
        assert!(route.validate_chaining().is_ok());
    }
}

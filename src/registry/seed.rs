//! Static seed table for the default chain registry (§4.1, §9 "hashed
//! string chain IDs forbidden - every chain gets an explicit stable integer
//! here, native id strings live in metadata").
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use super::chain::{Chain, ChainKind, NativeCurrency, ProviderChainId, ProviderIds};
use crate::types::{CanonicalChainId, ChainAddress};
use alloy::primitives::Address;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;

fn provider_ids(pairs: &[(&str, ProviderChainId)]) -> ProviderIds {
    let mut map = HashMap::new();
    for (provider, id) in pairs {
        map.insert((*provider).to_string(), Some(id.clone()));
    }
    ProviderIds(map)
}

/// Parses a checksummed hex address; the seed table's own entries are known
/// good, so a parse failure here is an invariant violation, not user input.
fn wrapped(hex: &str) -> ChainAddress {
    ChainAddress::Evm(Address::from_str(hex).expect("seed table address must be valid"))
}

/// The chains shipped by default. Operators extend this via their own
/// `ChainRegistryBuilder::add_chain` calls; nothing here is hardcoded into
/// `ChainRegistry` itself.
pub static DEFAULT_CHAINS: Lazy<Vec<Chain>> = Lazy::new(|| {
    vec![
        Chain {
            id: CanonicalChainId(1),
            name: "Ethereum".into(),
            kind: ChainKind::Evm,
            native_currency: NativeCurrency { symbol: "ETH".into(), decimals: 18 },
            wrapped_native: Some(wrapped("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")),
            metadata: HashMap::new(),
            provider_ids: provider_ids(&[("lifi", ProviderChainId::Numeric(1))]),
        },
        Chain {
            id: CanonicalChainId(137),
            name: "Polygon".into(),
            kind: ChainKind::Evm,
            native_currency: NativeCurrency { symbol: "MATIC".into(), decimals: 18 },
            wrapped_native: Some(wrapped("0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270")),
            metadata: HashMap::new(),
            provider_ids: provider_ids(&[("lifi", ProviderChainId::Numeric(137))]),
        },
        Chain {
            id: CanonicalChainId(42161),
            name: "Arbitrum".into(),
            kind: ChainKind::Evm,
            native_currency: NativeCurrency { symbol: "ETH".into(), decimals: 18 },
            wrapped_native: Some(wrapped("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1")),
            metadata: HashMap::new(),
            provider_ids: provider_ids(&[("lifi", ProviderChainId::Numeric(42161))]),
        },
        Chain {
            id: CanonicalChainId(900),
            name: "Solana".into(),
            kind: ChainKind::Solana,
            native_currency: NativeCurrency { symbol: "SOL".into(), decimals: 9 },
            wrapped_native: None,
            metadata: HashMap::from([("nativeChainId".to_string(), "mainnet-beta".to_string())]),
            provider_ids: provider_ids(&[("jupiter", ProviderChainId::Text("mainnet-beta".into()))]),
        },
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ChainRegistryBuilder;

    #[test]
    fn default_chains_build_a_valid_registry() {
        let mut builder = ChainRegistryBuilder::new();
        for chain in DEFAULT_CHAINS.iter() {
            builder = builder.add_chain(chain.clone());
        }
        let registry = builder.build().unwrap();
        assert_eq!(registry.all_chains().count(), 4);
        assert!(registry.get_chain(CanonicalChainId(1)).is_some());
    }
}

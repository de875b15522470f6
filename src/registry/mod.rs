//! Chain & Provider Registry (C1, §4.1).
//!
//! The single source of truth mapping canonical chain ids and token
//! addresses to every external provider's identifiers. Loaded once at
//! startup (`ChainRegistryBuilder::build`), immutable and freely shared
//! thereafter - the only process-wide singleton this core allows, per the
//! §9 design note preferring an explicit `Core` value over `getX()`
//! factories.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

pub mod chain;
pub mod provider;
pub mod seed;

pub use chain::{Chain, ChainKind, NativeCurrency, ProviderChainId, ProviderIds};
pub use provider::{AddressTransformer, TransformerRegistry};
pub use seed::DEFAULT_CHAINS;

use crate::error::RouterError;
use crate::types::{CanonicalChainId, TokenRef};
use std::collections::HashMap;

/// Preference order the Cross-Chain Route Builder (§4.6) tries bridge
/// tokens in: native-equivalents first, then major stables, then WETH.
const BRIDGE_TOKEN_PRIORITY: &[&str] = &["NATIVE", "USDC", "USDT", "WETH"];

/// Read-only after construction; safe to share behind an `Arc` across every
/// request and every component (§3.5 ownership note).
pub struct ChainRegistry {
    by_id: HashMap<CanonicalChainId, Chain>,
    by_provider: HashMap<(String, ProviderChainId), CanonicalChainId>,
    transformers: TransformerRegistry,
    /// symbol -> (chain -> token address), populated from the same static
    /// seed table as `by_id` (§4.6 "the registry exposes an ordered list of
    /// canonical bridge tokens").
    bridge_tokens: HashMap<String, HashMap<CanonicalChainId, TokenRef>>,
}

impl ChainRegistry {
    /// O(1).
    pub fn get_chain(&self, id: CanonicalChainId) -> Option<&Chain> {
        self.by_id.get(&id)
    }

    /// O(1); case-insensitive for string ids (normalized at insert time).
    pub fn get_chain_by_provider_id(
        &self,
        provider: &str,
        provider_id: &ProviderChainId,
    ) -> Option<&Chain> {
        let key = (provider.to_string(), chain::lookup_key(provider_id));
        self.by_provider.get(&key).and_then(|id| self.by_id.get(id))
    }

    pub fn to_provider_chain_id(
        &self,
        chain: CanonicalChainId,
        provider: &str,
    ) -> Option<ProviderChainId> {
        self.by_id.get(&chain)?.provider_ids.get(provider).cloned()
    }

    /// Most providers use the same address we already store; exceptions are
    /// declared once per provider via `TransformerRegistry` (§4.1).
    pub fn to_provider_token_address(&self, token: &TokenRef, provider: &str) -> Option<String> {
        // Translating an address presumes the provider supports the chain.
        self.by_id.get(&token.chain)?.provider_ids.get(provider)?;
        self.transformers.transform(provider, token)
    }

    pub fn is_wrapped_native(&self, token: &TokenRef) -> bool {
        self.by_id
            .get(&token.chain)
            .and_then(|c| c.wrapped_native.as_ref())
            .is_some_and(|w| w == &token.address)
    }

    pub fn wrapped_native(&self, chain: CanonicalChainId) -> Option<TokenRef> {
        let c = self.by_id.get(&chain)?;
        let addr = c.wrapped_native.clone()?;
        Some(TokenRef::new(chain, addr))
    }

    pub fn all_chains(&self) -> impl Iterator<Item = &Chain> {
        self.by_id.values()
    }

    /// §4.6 bridgeable token selection: every symbol present on both
    /// chains, in `BRIDGE_TOKEN_PRIORITY` order. `NATIVE` resolves to each
    /// chain's wrapped-native token rather than a literal symbol lookup.
    pub fn bridge_candidates(
        &self,
        from_chain: CanonicalChainId,
        to_chain: CanonicalChainId,
    ) -> Vec<(String, TokenRef, TokenRef)> {
        let mut out = Vec::new();
        for symbol in BRIDGE_TOKEN_PRIORITY {
            let pair = if *symbol == "NATIVE" {
                self.wrapped_native(from_chain).zip(self.wrapped_native(to_chain))
            } else {
                self.bridge_tokens.get(*symbol).and_then(|by_chain| {
                    by_chain
                        .get(&from_chain)
                        .cloned()
                        .zip(by_chain.get(&to_chain).cloned())
                })
            };
            if let Some((from_token, to_token)) = pair {
                out.push((symbol.to_string(), from_token, to_token));
            }
        }
        out
    }
}

#[derive(Default)]
pub struct ChainRegistryBuilder {
    chains: Vec<Chain>,
    transformers: TransformerRegistry,
    bridge_tokens: HashMap<String, HashMap<CanonicalChainId, TokenRef>>,
}

impl ChainRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chain(mut self, chain: Chain) -> Self {
        self.chains.push(chain);
        self
    }

    pub fn with_transformer(mut self, provider: impl Into<String>, t: AddressTransformer) -> Self {
        self.transformers.register(provider, t);
        self
    }

    /// Registers `token` as chain `chain`'s address for canonical bridge
    /// symbol `symbol` (e.g. `"USDC"`). Used to populate
    /// `ChainRegistry::bridge_candidates` (§4.6).
    pub fn with_bridge_token(mut self, symbol: impl Into<String>, chain: CanonicalChainId, token: TokenRef) -> Self {
        self.bridge_tokens.entry(symbol.into()).or_default().insert(chain, token);
        self
    }

    /// Fails fast on duplicate chain ids or duplicate `(provider, providerId)`
    /// pairs - a misconfigured registry must not silently misroute (§9 note
    /// that invariant violations are `Internal`, not swallowed).
    pub fn build(self) -> Result<ChainRegistry, RouterError> {
        let mut by_id = HashMap::with_capacity(self.chains.len());
        let mut by_provider = HashMap::new();

        for chain in self.chains {
            if by_id.contains_key(&chain.id) {
                return Err(RouterError::internal(format!(
                    "duplicate canonical chain id {}",
                    chain.id
                )));
            }
            for (provider, maybe_id) in chain.provider_ids.0.iter() {
                if let Some(provider_id) = maybe_id {
                    let key = (provider.clone(), chain::lookup_key(provider_id));
                    if let Some(existing) = by_provider.insert(key, chain.id) {
                        if existing != chain.id {
                            return Err(RouterError::internal(format!(
                                "provider {provider} id {provider_id:?} claimed by both chain {existing} and {}",
                                chain.id
                            )));
                        }
                    }
                }
            }
            by_id.insert(chain.id, chain);
        }

        Ok(ChainRegistry {
            by_id,
            by_provider,
            transformers: self.transformers,
            bridge_tokens: self.bridge_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChainAddress;
    use alloy::primitives::Address;

    fn sample_chain(id: u32, lifi_id: Option<u64>) -> Chain {
        let mut provider_ids = HashMap::new();
        provider_ids.insert(
            "lifi".to_string(),
            lifi_id.map(ProviderChainId::Numeric),
        );
        Chain {
            id: CanonicalChainId(id),
            name: format!("chain-{id}"),
            kind: ChainKind::Evm,
            native_currency: NativeCurrency {
                symbol: "ETH".into(),
                decimals: 18,
            },
            wrapped_native: Some(ChainAddress::Evm(Address::repeat_byte(0xEE))),
            metadata: HashMap::new(),
            provider_ids: ProviderIds(provider_ids),
        }
    }

    #[test]
    fn round_trip_by_provider_id() {
        let registry = ChainRegistryBuilder::new()
            .add_chain(sample_chain(1, Some(1)))
            .add_chain(sample_chain(10, Some(10)))
            .build()
            .unwrap();

        for chain in registry.all_chains() {
            if let Some(provider_id) = registry.to_provider_chain_id(chain.id, "lifi") {
                let round_tripped = registry
                    .get_chain_by_provider_id("lifi", &provider_id)
                    .unwrap();
                assert_eq!(round_tripped.id, chain.id);
            }
        }
    }

    #[test]
    fn missing_provider_mapping_is_none_not_error() {
        let registry = ChainRegistryBuilder::new()
            .add_chain(sample_chain(56, None))
            .build()
            .unwrap();
        assert_eq!(registry.to_provider_chain_id(CanonicalChainId(56), "lifi"), None);
    }

    #[test]
    fn duplicate_chain_id_rejected() {
        let result = ChainRegistryBuilder::new()
            .add_chain(sample_chain(1, Some(1)))
            .add_chain(sample_chain(1, Some(2)))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn wrapped_native_lookup() {
        let registry = ChainRegistryBuilder::new()
            .add_chain(sample_chain(1, Some(1)))
            .build()
            .unwrap();
        let weth = registry.wrapped_native(CanonicalChainId(1)).unwrap();
        assert!(registry.is_wrapped_native(&weth));
    }
}

//! Chain metadata entities (§3.2).
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::types::{CanonicalChainId, ChainAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainKind {
    Evm,
    Solana,
    Cosmos,
    Sui,
    Ton,
    Bitcoin,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub symbol: String,
    pub decimals: u8,
}

/// A provider's own identifier for one of our chains. String ids
/// (Cosmos chain-id strings, provider slugs) are compared case-insensitively;
/// numeric ids compare exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderChainId {
    Numeric(u64),
    Text(String),
}

impl ProviderChainId {
    /// Normalized key used for case-insensitive lookup of `Text` variants.
    fn lookup_key(&self) -> ProviderChainId {
        match self {
            ProviderChainId::Numeric(n) => ProviderChainId::Numeric(*n),
            ProviderChainId::Text(s) => ProviderChainId::Text(s.to_lowercase()),
        }
    }
}

/// Mapping from provider name to that provider's chain identifier. A `None`
/// entry is a deliberate absence - the provider cannot route on that chain -
/// not an error (§4.1 contract).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderIds(pub HashMap<String, Option<ProviderChainId>>);

impl ProviderIds {
    pub fn get(&self, provider: &str) -> Option<&ProviderChainId> {
        self.0.get(provider).and_then(|v| v.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub id: CanonicalChainId,
    pub name: String,
    pub kind: ChainKind,
    pub native_currency: NativeCurrency,
    pub wrapped_native: Option<ChainAddress>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub provider_ids: ProviderIds,
}

pub(super) fn lookup_key(id: &ProviderChainId) -> ProviderChainId {
    id.lookup_key()
}

//! Per-provider address transformers (§4.1).
//!
//! Most providers accept the same address representation the core already
//! stores. The exceptions (Solana mint format, Cosmos denoms) are declared
//! once per provider here rather than special-cased at every call site.
//!
//! Author: AI-Generated
//! Created: 2026-07-28

use crate::types::{ChainAddress, TokenRef, NATIVE};
use std::collections::HashMap;

pub type AddressTransformer = Box<dyn Fn(&TokenRef) -> Option<String> + Send + Sync>;

/// Default transform: the provider wants the same string form we already
/// keep internally.
pub fn identity_transform() -> AddressTransformer {
    Box::new(|token: &TokenRef| Some(token.address.to_string()))
}

/// Jupiter and most Solana aggregators expect `So11111111111111111111111111111111111111112`
/// (wrapped SOL mint) for the native asset instead of a sentinel string.
pub fn solana_native_as_wsol_transform() -> AddressTransformer {
    const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";
    Box::new(|token: &TokenRef| {
        if token.is_native() {
            Some(WSOL_MINT.to_string())
        } else {
            match &token.address {
                ChainAddress::Base58(s) => Some(s.clone()),
                ChainAddress::Text(s) if s != NATIVE => Some(s.clone()),
                _ => None,
            }
        }
    })
}

/// Cosmos providers want the bare bech32 denom, with the `native` sentinel
/// translated to the chain's own fee denom (declared per chain in metadata).
pub fn cosmos_denom_transform(native_denom_metadata_key: &'static str) -> AddressTransformer {
    Box::new(move |token: &TokenRef| match &token.address {
        ChainAddress::Text(s) if s == NATIVE => Some(native_denom_metadata_key.to_string()),
        ChainAddress::Text(s) => Some(s.clone()),
        _ => None,
    })
}

/// Holds one transformer per provider name. Registries without a custom
/// entry fall back to `identity_transform`.
#[derive(Default)]
pub struct TransformerRegistry(HashMap<String, AddressTransformer>);

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: impl Into<String>, transform: AddressTransformer) {
        self.0.insert(provider.into(), transform);
    }

    pub fn transform(&self, provider: &str, token: &TokenRef) -> Option<String> {
        match self.0.get(provider) {
            Some(f) => f(token),
            None => identity_transform()(token),
        }
    }
}

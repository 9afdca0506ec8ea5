// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secure-token bootstrap: authority key exchange and filter activation.

use crate::authority::Authority;
use crate::error::AgentError;
use crate::security::filter::{TokenFilter, TrustMaterial};
use crate::security::keystore::{KeyMaterial, KeyStoreSettings};

/// Fetch the authority key, open the key store, and activate `filter`.
///
/// Each step runs only when the previous one succeeded; there is no fallback
/// to insecure operation. Returns the loaded key material so the caller can
/// reuse the participant's public key.
pub async fn bootstrap_trust(
    authority: &dyn Authority,
    keystore: Option<&KeyStoreSettings>,
    filter: &TokenFilter,
) -> Result<KeyMaterial, AgentError> {
    let authority_public_key =
        authority.fetch_public_key().await.ok_or(AgentError::AuthorityKeyMissing)?;
    tracing::debug!(len = authority_public_key.der().len(), "authority public key fetched");

    let settings =
        keystore.ok_or_else(|| AgentError::KeyStore("no key store configured".to_owned()))?;
    let material = KeyMaterial::load(settings)?;

    let private_key = material.private_key().clone();
    tracing::debug!(algorithm = ?private_key.algorithm(), "participant private key loaded");

    filter.activate(TrustMaterial { authority_public_key, private_key })?;
    Ok(material)
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration of the inbound token filter.
//!
//! Once activated, inbound requests are expected to carry a token issued by
//! the authority and encrypted for this participant. Verifying those tokens
//! happens in the serving layer; this type only holds the key pair it needs.

use std::sync::OnceLock;

use crate::authority::AuthorityKey;
use crate::error::AgentError;
use crate::security::keystore::PrivateKey;

/// Keys injected into the token filter.
#[derive(Debug, Clone)]
pub struct TrustMaterial {
    pub authority_public_key: AuthorityKey,
    pub private_key: PrivateKey,
}

/// Inbound token filter. Activated at most once per process.
#[derive(Debug, Default)]
pub struct TokenFilter {
    material: OnceLock<TrustMaterial>,
}

impl TokenFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject the authority key and the participant's private key.
    pub fn activate(&self, material: TrustMaterial) -> Result<(), AgentError> {
        if material.authority_public_key.der().is_empty() {
            return Err(AgentError::Filter("authority public key is empty".to_owned()));
        }
        if material.private_key.is_empty() {
            return Err(AgentError::Filter("private key is empty".to_owned()));
        }
        self.material
            .set(material)
            .map_err(|_| AgentError::Filter("token filter is already active".to_owned()))?;
        tracing::info!("token security filter active");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.material.get().is_some()
    }

    pub fn trust_material(&self) -> Option<&TrustMaterial> {
        self.material.get()
    }
}

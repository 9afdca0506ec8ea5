// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::security::keystore::KeyMaterial;

/// Identity of this participant as announced to core systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantIdentity {
    pub system_name: String,
    pub address: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_info: Option<String>,
}

impl ParticipantIdentity {
    /// Identity without authentication info.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            system_name: config.system_name.clone(),
            address: config.address.clone(),
            port: config.port,
            authentication_info: None,
        }
    }

    /// Copy of this identity with `authenticationInfo` encoded from `own_key`.
    ///
    /// Pass `None` when transport encryption is off; the copy then carries no
    /// authentication info.
    pub fn snapshot(&self, own_key: Option<&KeyMaterial>) -> Self {
        Self {
            authentication_info: own_key.map(KeyMaterial::public_key_base64),
            ..self.clone()
        }
    }
}

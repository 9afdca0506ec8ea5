// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::security::keystore::KeyStoreType;

/// Default endpoint polled for proximity submodels.
pub const DEFAULT_DATA_SOURCE_URL: &str =
    "http://localhost:8082/registry/api/v1/registry/ProximitySensorID/submodels";

/// Registration and publishing agent for a car provider participant.
#[derive(Debug, Clone, Parser)]
#[command(name = "proxagent", version, about)]
pub struct AgentConfig {
    /// System name announced to the directory and in published events.
    #[arg(long, default_value = "carproviderwithpublishing", env = "PROXAGENT_SYSTEM_NAME")]
    pub system_name: String,

    /// Address announced for this participant.
    #[arg(long, default_value = "127.0.0.1", env = "PROXAGENT_ADDRESS")]
    pub address: String,

    /// Port announced for this participant.
    #[arg(long, default_value_t = 8889, env = "PROXAGENT_PORT")]
    pub port: u16,

    /// Transport encryption is enabled for this participant.
    #[arg(long, env = "PROXAGENT_SSL_ENABLED")]
    pub ssl_enabled: bool,

    /// Inbound token filtering is enabled (only effective with `--ssl-enabled`).
    #[arg(long, env = "PROXAGENT_TOKEN_FILTER_ENABLED")]
    pub token_filter_enabled: bool,

    /// Key store encoding: `pem` or `der` (PKCS#8).
    #[arg(long, default_value = "pem", env = "PROXAGENT_KEYSTORE_TYPE")]
    pub keystore_type: KeyStoreType,

    /// Path to the participant's key store.
    #[arg(long, env = "PROXAGENT_KEYSTORE_PATH")]
    pub keystore_path: Option<PathBuf>,

    /// Key store password.
    #[arg(long, env = "PROXAGENT_KEYSTORE_PASSWORD")]
    pub keystore_password: Option<String>,

    /// Password of the private key entry.
    #[arg(long, env = "PROXAGENT_KEY_PASSWORD")]
    pub key_password: Option<String>,

    /// Base URL of the directory (service registry).
    #[arg(long, default_value = "http://127.0.0.1:8443", env = "PROXAGENT_DIRECTORY_URL")]
    pub directory_url: String,

    /// Base URL of the authorization authority.
    #[arg(long, default_value = "http://127.0.0.1:8445", env = "PROXAGENT_AUTHORITY_URL")]
    pub authority_url: String,

    /// Base URL of the event handler.
    #[arg(long, default_value = "http://127.0.0.1:8455", env = "PROXAGENT_EVENT_HANDLER_URL")]
    pub event_handler_url: String,

    /// URL polled for submodel records.
    #[arg(long, default_value = DEFAULT_DATA_SOURCE_URL, env = "PROXAGENT_DATA_SOURCE_URL")]
    pub data_source_url: String,

    /// `idShort` of the record whose value is published.
    #[arg(long, default_value = "ProximityData", env = "PROXAGENT_TARGET_ID_SHORT")]
    pub target_id_short: String,

    /// Publish cycle period in milliseconds.
    #[arg(long, default_value_t = 5000, env = "PROXAGENT_POLL_MS")]
    pub poll_ms: u64,

    /// Per-request timeout for collaborator calls in milliseconds.
    #[arg(long, default_value_t = 10000, env = "PROXAGENT_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: u64,
}

impl AgentConfig {
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Token-secured mode needs both transport encryption and token filtering.
    pub fn token_security(&self) -> bool {
        self.ssl_enabled && self.token_filter_enabled
    }

    /// Validate option combinations once at startup.
    ///
    /// Contradictory but survivable settings are returned as warnings; settings
    /// that make startup impossible are errors.
    pub fn check(&self) -> anyhow::Result<Vec<String>> {
        let mut warnings = Vec::new();
        if !self.ssl_enabled && self.token_filter_enabled {
            warnings.push(
                "contradictory configuration: token filter enabled while ssl is disabled"
                    .to_owned(),
            );
        }
        if self.ssl_enabled && self.keystore_path.is_none() {
            anyhow::bail!("--keystore-path is required when ssl is enabled");
        }
        if self.poll_ms == 0 {
            anyhow::bail!("--poll-ms must be greater than zero");
        }
        Ok(warnings)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

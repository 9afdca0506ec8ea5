// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Security mode selection and the secure-token bootstrap.

pub mod bootstrap;
pub mod filter;
pub mod keystore;

use serde::{Deserialize, Serialize};

/// Interface tag for capabilities served over TLS.
pub const INTERFACE_SECURE: &str = "HTTP-SECURE-JSON";
/// Interface tag for capabilities served in plain HTTP.
pub const INTERFACE_INSECURE: &str = "HTTP-INSECURE-JSON";

/// How consumers must authenticate against an offered capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityMode {
    NotSecure,
    Certificate,
    Token,
}

impl SecurityMode {
    /// Pick the mode for the given transport flags.
    ///
    /// Token filtering without encryption falls through to `NotSecure`.
    pub fn select(ssl_enabled: bool, token_filter_enabled: bool) -> Self {
        match (ssl_enabled, token_filter_enabled) {
            (true, true) => Self::Token,
            (true, false) => Self::Certificate,
            (false, _) => Self::NotSecure,
        }
    }

    pub fn interface(&self) -> &'static str {
        match self {
            Self::NotSecure => INTERFACE_INSECURE,
            Self::Certificate | Self::Token => INTERFACE_SECURE,
        }
    }

    /// Whether descriptors in this mode carry the participant's public key.
    pub fn attaches_public_key(&self) -> bool {
        !matches!(self, Self::NotSecure)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSecure => "NOT_SECURE",
            Self::Certificate => "CERTIFICATE",
            Self::Token => "TOKEN",
        }
    }
}

impl std::fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Fatal startup failures. Any of these keeps the agent from reaching `Running`.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{system} is unreachable")]
    Unreachable { system: CoreSystem },

    #[error("authorization public key is missing")]
    AuthorityKeyMissing,

    #[error("key store error: {0}")]
    KeyStore(String),

    #[error("token filter error: {0}")]
    Filter(String),

    #[error("failed to register {definition}: {reason:#}")]
    Registration { definition: String, reason: anyhow::Error },
}

/// Core collaborators whose reachability gates startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreSystem {
    Directory,
    Authority,
    EventHandler,
}

impl CoreSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "SERVICE_REGISTRY",
            Self::Authority => "AUTHORIZATION",
            Self::EventHandler => "EVENT_HANDLER",
        }
    }
}

impl std::fmt::Display for CoreSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

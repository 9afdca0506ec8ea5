// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authorization authority: reachability and public key retrieval.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::client::ServiceClient;
use crate::directory::target::ServiceTarget;
use crate::directory::Directory;
use crate::BoxFuture;

const ECHO_PATH: &str = "/authorization/echo";
const PUBLIC_KEY_PATH: &str = "/authorization/publickey";

/// Directory name of the authority's public key service.
pub const AUTH_PUBLIC_KEY_SERVICE: &str = "auth-public-key";

/// Public key of the authorization authority, DER encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKey {
    der: Vec<u8>,
}

impl AuthorityKey {
    /// Decode a base64 key; `None` for empty or undecodable input.
    pub fn from_base64(encoded: &str) -> Option<Self> {
        let der = STANDARD.decode(encoded.trim()).ok()?;
        if der.is_empty() {
            return None;
        }
        Some(Self { der })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

/// Contract of the authorization collaborator.
pub trait Authority: Send + Sync {
    fn reachable(&self) -> BoxFuture<'_, bool>;

    /// Re-resolve the public key endpoint.
    fn refresh_endpoints(&self) -> BoxFuture<'_, anyhow::Result<()>>;

    /// Fetch the authority's public key. Transport failures resolve to `None`.
    fn fetch_public_key(&self) -> BoxFuture<'_, Option<AuthorityKey>>;
}

/// HTTP client for the authorization core system.
///
/// Echo always goes to the configured URL; the public key is fetched from
/// wherever the directory last listed `auth-public-key`.
pub struct HttpAuthority {
    echo: ServiceClient,
    public_key: ServiceTarget,
}

impl HttpAuthority {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        directory: Option<Arc<dyn Directory>>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            public_key: ServiceTarget::new(
                base_url.clone(),
                PUBLIC_KEY_PATH,
                AUTH_PUBLIC_KEY_SERVICE,
                timeout,
                directory,
            ),
            echo: ServiceClient::new(base_url, timeout),
        }
    }

    /// Current public key URL.
    pub async fn public_key_url(&self) -> String {
        self.public_key.url().await
    }
}

impl Authority for HttpAuthority {
    fn reachable(&self) -> BoxFuture<'_, bool> {
        Box::pin(self.echo.echo(ECHO_PATH))
    }

    fn refresh_endpoints(&self) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(self.public_key.refresh())
    }

    fn fetch_public_key(&self) -> BoxFuture<'_, Option<AuthorityKey>> {
        Box::pin(async move {
            let (client, path) = self.public_key.get().await;
            let body = match client.get_text(&path).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(err = %e, "authority public key request failed");
                    return None;
                }
            };
            // Served as a JSON string literal; tolerate a bare body too.
            let encoded = serde_json::from_str::<String>(&body).unwrap_or(body);
            AuthorityKey::from_base64(&encoded)
        })
    }
}

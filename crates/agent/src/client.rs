// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client wrapper shared by the collaborator adapters.

use std::sync::Once;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;

static CRYPTO_PROVIDER: Once = Once::new();

/// Install the ring provider for rustls once per process.
pub fn install_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // Err means another provider is already installed, which is fine.
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// HTTP client bound to one collaborator base URL.
pub struct ServiceClient {
    base_url: String,
    client: Client,
}

impl ServiceClient {
    /// Client for a base URL that paths get appended to; a trailing `/` is dropped.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::exact(base_url.into().trim_end_matches('/'), timeout)
    }

    /// Client for a complete URL, kept byte for byte. Request with an empty path.
    pub fn exact(url: impl Into<String>, timeout: Duration) -> Self {
        install_crypto_provider();
        let client = Client::builder().timeout(timeout).build().unwrap_or_default();
        Self { base_url: url.into(), client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `true` when `GET path` answers with a success status.
    pub async fn echo(&self, path: &str) -> bool {
        match self.client.get(self.url(path)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(url = %self.url(path), err = %e, "echo failed");
                false
            }
        }
    }

    /// GET a path and return the body as text.
    pub async fn get_text(&self, path: &str) -> anyhow::Result<String> {
        let resp = self.client.get(self.url(path)).send().await?;
        Ok(resp.error_for_status()?.text().await?)
    }

    /// POST JSON and return the raw response, leaving status handling to the caller.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// POST JSON and decode the JSON response body (`Null` when empty).
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<serde_json::Value> {
        let resp = self.post(path, body).await?.error_for_status()?;
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// DELETE with query parameters and return the raw response.
    pub async fn delete(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Response> {
        Ok(self.client.delete(self.url(path)).query(query).send().await?)
    }
}

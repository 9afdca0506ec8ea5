// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the service registry core system.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::client::ServiceClient;
use crate::directory::{CapabilityDescriptor, Directory, ServiceEndpoint};
use crate::identity::ParticipantIdentity;
use crate::security::SecurityMode;
use crate::BoxFuture;

const ECHO_PATH: &str = "/serviceregistry/echo";
const REGISTER_PATH: &str = "/serviceregistry/register";
const UNREGISTER_PATH: &str = "/serviceregistry/unregister";
const QUERY_PATH: &str = "/serviceregistry/query";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResult {
    #[serde(default)]
    service_query_data: Vec<QueryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryEntry {
    #[serde(default)]
    service_uri: String,
    provider: ParticipantIdentity,
    #[serde(default)]
    secure: Option<SecurityMode>,
}

/// Service registry reached over HTTP.
pub struct HttpDirectory {
    client: ServiceClient,
}

impl HttpDirectory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self { client: ServiceClient::new(base_url, timeout) }
    }

    async fn register(&self, descriptor: &CapabilityDescriptor) -> anyhow::Result<StatusCode> {
        let resp = self.client.post(REGISTER_PATH, descriptor).await?;
        let status = resp.status();
        if status.is_success() || status == StatusCode::BAD_REQUEST {
            return Ok(status);
        }
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("register failed ({status}): {text}");
    }

    async fn force_register(&self, descriptor: &CapabilityDescriptor) -> anyhow::Result<()> {
        if self.register(descriptor).await?.is_success() {
            return Ok(());
        }

        // 400 means a record with this key exists: replace it once.
        tracing::debug!(
            definition = %descriptor.service_definition,
            "capability already registered, replacing"
        );
        let d = descriptor;
        self.unregister(&d.service_definition, &d.service_uri, &d.provider_system).await?;
        let status = self.register(descriptor).await?;
        if !status.is_success() {
            anyhow::bail!("register rejected after replacing existing entry ({status})");
        }
        Ok(())
    }

    async fn unregister(
        &self,
        definition: &str,
        uri: &str,
        provider: &ParticipantIdentity,
    ) -> anyhow::Result<()> {
        let query = [
            ("service_definition", definition.to_owned()),
            ("system_name", provider.system_name.clone()),
            ("address", provider.address.clone()),
            ("port", provider.port.to_string()),
            ("service_uri", uri.to_owned()),
        ];
        let resp = self.client.delete(UNREGISTER_PATH, &query).await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::BAD_REQUEST || status == StatusCode::NOT_FOUND {
            tracing::debug!(definition, %status, "no registration to remove");
            return Ok(());
        }
        let text = resp.text().await.unwrap_or_default();
        anyhow::bail!("unregister failed ({status}): {text}");
    }

    async fn query(&self, definition: &str) -> anyhow::Result<Option<ServiceEndpoint>> {
        let body = serde_json::json!({ "serviceDefinitionRequirement": definition });
        let value = self.client.post_json(QUERY_PATH, &body).await?;
        let result: QueryResult = serde_json::from_value(value)?;

        Ok(result.service_query_data.into_iter().next().map(|entry| {
            let scheme = match entry.secure {
                Some(SecurityMode::Certificate | SecurityMode::Token) => "https",
                _ => "http",
            };
            ServiceEndpoint {
                base_url: format!("{scheme}://{}:{}", entry.provider.address, entry.provider.port),
                service_uri: entry.service_uri,
            }
        }))
    }
}

impl Directory for HttpDirectory {
    fn reachable(&self) -> BoxFuture<'_, bool> {
        Box::pin(self.client.echo(ECHO_PATH))
    }

    fn upsert<'a>(
        &'a self,
        descriptor: &'a CapabilityDescriptor,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(self.force_register(descriptor))
    }

    fn delete<'a>(
        &'a self,
        definition: &'a str,
        uri: &'a str,
        provider: &'a ParticipantIdentity,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(self.unregister(definition, uri, provider))
    }

    fn lookup<'a>(
        &'a self,
        definition: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Option<ServiceEndpoint>>> {
        Box::pin(self.query(definition))
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the event handler core system.

use std::sync::Arc;
use std::time::Duration;

use crate::client::ServiceClient;
use crate::directory::target::ServiceTarget;
use crate::directory::Directory;
use crate::events::{EventSink, PublishedEvent};
use crate::BoxFuture;

const ECHO_PATH: &str = "/eventhandler/echo";
const PUBLISH_PATH: &str = "/eventhandler/publish";

/// Directory name of the event handler's publish service.
pub const EVENT_PUBLISH_SERVICE: &str = "event-publish";

/// Event handler reached over HTTP.
///
/// Starts out publishing to the configured base URL; `refresh_endpoints`
/// switches to whatever provider the directory lists for `event-publish`.
pub struct HttpEventHandler {
    echo: ServiceClient,
    publish: ServiceTarget,
}

impl HttpEventHandler {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        directory: Option<Arc<dyn Directory>>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            publish: ServiceTarget::new(
                base_url.clone(),
                PUBLISH_PATH,
                EVENT_PUBLISH_SERVICE,
                timeout,
                directory,
            ),
            echo: ServiceClient::new(base_url, timeout),
        }
    }

    /// Current publish URL.
    pub async fn publish_url(&self) -> String {
        self.publish.url().await
    }

    async fn submit(&self, event: &PublishedEvent) -> anyhow::Result<()> {
        let (client, path) = self.publish.get().await;
        client.post_json(&path, event).await?;
        Ok(())
    }
}

impl EventSink for HttpEventHandler {
    fn reachable(&self) -> BoxFuture<'_, bool> {
        Box::pin(self.echo.echo(ECHO_PATH))
    }

    fn refresh_endpoints(&self) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(self.publish.refresh())
    }

    fn publish<'a>(&'a self, event: &'a PublishedEvent) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(self.submit(event))
    }
}

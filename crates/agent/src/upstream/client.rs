// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the polled data source.

use std::time::Duration;

use crate::client::ServiceClient;
use crate::BoxFuture;

/// Contract of the polled data source: one read returning the raw body.
pub trait DataSource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, anyhow::Result<String>>;
}

/// Data source read with a plain `GET` on a fixed URL.
pub struct HttpDataSource {
    client: ServiceClient,
}

impl HttpDataSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self { client: ServiceClient::exact(url, timeout) }
    }

    pub fn url(&self) -> &str {
        self.client.base_url()
    }
}

impl DataSource for HttpDataSource {
    fn fetch(&self) -> BoxFuture<'_, anyhow::Result<String>> {
        Box::pin(self.client.get_text(""))
    }
}

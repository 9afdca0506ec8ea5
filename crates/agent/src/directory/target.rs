// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service endpoints that follow the directory's listing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::client::ServiceClient;
use crate::directory::Directory;

struct Current {
    client: Arc<ServiceClient>,
    path: String,
}

/// A core service path, initially at its configured base URL.
///
/// `refresh` re-points it at whatever provider the directory lists for
/// `definition`; an empty listing keeps the current endpoint.
pub struct ServiceTarget {
    definition: &'static str,
    timeout: Duration,
    directory: Option<Arc<dyn Directory>>,
    current: RwLock<Current>,
}

impl ServiceTarget {
    pub fn new(
        base_url: impl Into<String>,
        path: &str,
        definition: &'static str,
        timeout: Duration,
        directory: Option<Arc<dyn Directory>>,
    ) -> Self {
        let current = Current {
            client: Arc::new(ServiceClient::new(base_url, timeout)),
            path: path.to_owned(),
        };
        Self { definition, timeout, directory, current: RwLock::new(current) }
    }

    pub async fn url(&self) -> String {
        let current = self.current.read().await;
        format!("{}{}", current.client.base_url(), current.path)
    }

    /// Client and path to use for the next request.
    pub async fn get(&self) -> (Arc<ServiceClient>, String) {
        let current = self.current.read().await;
        (Arc::clone(&current.client), current.path.clone())
    }

    pub async fn refresh(&self) -> anyhow::Result<()> {
        let Some(ref directory) = self.directory else {
            return Ok(());
        };
        match directory.lookup(self.definition).await? {
            Some(endpoint) => {
                tracing::info!(
                    definition = self.definition,
                    url = %endpoint.url(),
                    "service endpoint refreshed"
                );
                let mut current = self.current.write().await;
                current.client = Arc::new(ServiceClient::new(endpoint.base_url, self.timeout));
                current.path = endpoint.service_uri;
            }
            None => {
                tracing::debug!(
                    definition = self.definition,
                    "directory lists no provider, keeping configured URL"
                );
            }
        }
        Ok(())
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proxagent: registers a service participant with an Arrowhead-style local
//! cloud and republishes proximity readings as events until shutdown.

pub mod authority;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod events;
pub mod identity;
pub mod lifecycle;
pub mod registration;
pub mod security;
pub mod upstream;

#[cfg(test)]
mod test_support;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::authority::{Authority, HttpAuthority};
use crate::config::AgentConfig;
use crate::directory::client::HttpDirectory;
use crate::directory::Directory;
use crate::events::http::HttpEventHandler;
use crate::events::EventSink;
use crate::lifecycle::{Agent, Collaborators};
use crate::upstream::client::HttpDataSource;

/// Boxed future returned by the collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Wire up the HTTP collaborators described by `config`.
///
/// The authority and the event handler re-resolve their endpoints through
/// the directory when asked to refresh.
pub fn collaborators(config: &AgentConfig) -> Collaborators {
    let timeout = config.request_timeout();
    let directory: Arc<dyn Directory> =
        Arc::new(HttpDirectory::new(config.directory_url.clone(), timeout));

    let authority: Arc<dyn Authority> = Arc::new(HttpAuthority::new(
        config.authority_url.clone(),
        timeout,
        Some(Arc::clone(&directory)),
    ));
    let events: Arc<dyn EventSink> = Arc::new(HttpEventHandler::new(
        config.event_handler_url.clone(),
        timeout,
        Some(Arc::clone(&directory)),
    ));

    Collaborators {
        directory,
        authority,
        events,
        source: Arc::new(HttpDataSource::new(config.data_source_url.clone(), timeout)),
    }
}

/// Run the agent until SIGTERM or SIGINT.
///
/// Startup failures are returned as-is; registrations made before the
/// failure are left in place.
pub async fn run(config: AgentConfig) -> anyhow::Result<()> {
    let collab = collaborators(&config);
    let mut agent = Agent::new(config, collab);
    agent.start().await?;

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());
    shutdown.cancelled().await;

    agent.stop().await;
    Ok(())
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).ok();
        let mut sigint =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()).ok();

        tokio::select! {
            _ = async {
                if let Some(ref mut s) = sigterm { s.recv().await } else { std::future::pending().await }
            } => {
                info!("received SIGTERM");
            }
            _ = async {
                if let Some(ref mut s) = sigint { s.recv().await } else { std::future::pending().await }
            } => {
                info!("received SIGINT");
            }
        }
        shutdown.cancel();
    });
}

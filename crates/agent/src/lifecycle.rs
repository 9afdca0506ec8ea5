// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup/shutdown sequencing and the recurring publish job.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::authority::Authority;
use crate::config::AgentConfig;
use crate::directory::Directory;
use crate::error::{AgentError, CoreSystem};
use crate::events::publisher::EventPublisher;
use crate::events::EventSink;
use crate::identity::ParticipantIdentity;
use crate::registration::{RegistrationClient, OFFERED_CAPABILITIES};
use crate::security::bootstrap::bootstrap_trust;
use crate::security::filter::TokenFilter;
use crate::security::keystore::{KeyMaterial, KeyStoreSettings};
use crate::security::SecurityMode;
use crate::upstream::client::DataSource;
use crate::upstream::poller::ExternalPoller;

/// Where the agent is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Init,
    ReachabilityChecked,
    SecureBootstrapped,
    SkippedSecure,
    Registered,
    Running,
    ShuttingDown,
    Terminated,
}

/// External systems the agent talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub directory: Arc<dyn Directory>,
    pub authority: Arc<dyn Authority>,
    pub events: Arc<dyn EventSink>,
    pub source: Arc<dyn DataSource>,
}

/// Owns the participant's registrations and the publish job.
pub struct Agent {
    config: AgentConfig,
    collab: Collaborators,
    identity: ParticipantIdentity,
    filter: Arc<TokenFilter>,
    own_key: Option<Arc<KeyMaterial>>,
    state: LifecycleState,
    job: Option<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl Agent {
    pub fn new(config: AgentConfig, collab: Collaborators) -> Self {
        let identity = ParticipantIdentity::from_config(&config);
        Self {
            config,
            collab,
            identity,
            filter: Arc::new(TokenFilter::new()),
            own_key: None,
            state: LifecycleState::Init,
            job: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn token_filter(&self) -> &TokenFilter {
        &self.filter
    }

    fn registration(&self) -> RegistrationClient {
        RegistrationClient::new(
            Arc::clone(&self.collab.directory),
            self.identity.clone(),
            SecurityMode::select(self.config.ssl_enabled, self.config.token_filter_enabled),
            self.own_key.clone(),
        )
    }

    fn publisher(&self) -> EventPublisher {
        EventPublisher::new(
            Arc::clone(&self.collab.events),
            self.identity.clone(),
            self.own_key.clone(),
        )
    }

    fn poller(&self) -> ExternalPoller {
        ExternalPoller::new(Arc::clone(&self.collab.source), self.config.target_id_short.clone())
    }

    /// Run startup through to `Running`.
    ///
    /// Any error leaves the agent short of `Running` with no publish job.
    /// Registrations made before the failure are not rolled back.
    pub async fn start(&mut self) -> Result<(), AgentError> {
        let warnings = self.config.check().map_err(|e| AgentError::Config(format!("{e:#}")))?;
        for warning in warnings {
            warn!("{warning}");
        }

        if !self.collab.directory.reachable().await {
            return Err(AgentError::Unreachable { system: CoreSystem::Directory });
        }
        let token_security = self.config.token_security();
        if token_security && !self.collab.authority.reachable().await {
            return Err(AgentError::Unreachable { system: CoreSystem::Authority });
        }
        self.state = LifecycleState::ReachabilityChecked;

        let keystore = KeyStoreSettings::from_config(&self.config);
        if token_security {
            if let Err(e) = self.collab.authority.refresh_endpoints().await {
                warn!(err = %e, "authority endpoint refresh failed, using configured URL");
            }
            let material =
                bootstrap_trust(self.collab.authority.as_ref(), keystore.as_ref(), &self.filter)
                    .await?;
            self.own_key = Some(Arc::new(material));
            self.state = LifecycleState::SecureBootstrapped;
        } else {
            info!("token security filter is not active");
            if self.config.ssl_enabled {
                let settings = keystore
                    .ok_or_else(|| AgentError::KeyStore("no key store configured".to_owned()))?;
                self.own_key = Some(Arc::new(KeyMaterial::load(&settings)?));
            }
            self.state = LifecycleState::SkippedSecure;
        }

        let registration = self.registration();
        for capability in &OFFERED_CAPABILITIES {
            let descriptor = registration.build_descriptor(capability);
            registration.register_capability(&descriptor).await.map_err(|reason| {
                AgentError::Registration { definition: capability.definition.to_owned(), reason }
            })?;
        }
        self.state = LifecycleState::Registered;

        if self.collab.events.reachable().await {
            if let Err(e) = self.collab.events.refresh_endpoints().await {
                warn!(err = %e, "event handler endpoint refresh failed");
            }
        } else {
            warn!("{} is not reachable, publishing anyway", CoreSystem::EventHandler);
        }

        self.job = Some(spawn_publish_job(
            Arc::new(self.poller()),
            Arc::new(self.publisher()),
            self.config.poll_period(),
            self.cancel.clone(),
        ));
        self.state = LifecycleState::Running;
        info!(
            system = %self.identity.system_name,
            period_ms = self.config.poll_ms,
            "agent running"
        );
        Ok(())
    }

    /// Halt the publish job, publish a final event, and deregister.
    ///
    /// Every step is best-effort. Runs at most once; later calls are no-ops.
    pub async fn stop(&mut self) {
        if self.state == LifecycleState::Terminated {
            return;
        }
        self.state = LifecycleState::ShuttingDown;

        self.cancel.cancel();
        if let Some(job) = self.job.take() {
            if let Err(e) = job.await {
                warn!(err = %e, "publish job ended abnormally");
            }
        }

        run_cycle(&self.poller(), &self.publisher()).await;

        let registration = self.registration();
        for capability in &OFFERED_CAPABILITIES {
            registration.deregister_capability(capability.definition, capability.uri).await;
        }

        self.state = LifecycleState::Terminated;
        info!("agent terminated");
    }
}

/// Poll once and publish the reading. Publish errors are logged, not returned.
pub async fn run_cycle(poller: &ExternalPoller, publisher: &EventPublisher) {
    let reading = poller.poll_reading().await;
    match publisher.publish(&reading).await {
        Ok(event) => info!(payload = %event.payload, "sending event to event handler"),
        Err(e) => warn!(err = %e, "event publish failed"),
    }
}

/// Spawn the recurring poll+publish job.
///
/// The first cycle starts immediately. Cycles run one at a time: a cycle that
/// overruns `period` delays the next tick instead of overlapping it.
/// Cancellation stops new cycles but never interrupts one in flight.
pub fn spawn_publish_job(
    poller: Arc<ExternalPoller>,
    publisher: Arc<EventPublisher>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = timer.tick() => {}
            }

            // Own task so a panicking cycle cannot take the job down.
            let cycle = {
                let poller = Arc::clone(&poller);
                let publisher = Arc::clone(&publisher);
                tokio::spawn(async move { run_cycle(&poller, &publisher).await })
            };
            if let Err(e) = cycle.await {
                warn!(err = %e, "publish cycle aborted");
            }
        }

        debug!("publish job stopped");
    })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

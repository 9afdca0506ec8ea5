// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wraps readings into events and submits them to the event sink.

use std::sync::Arc;

use chrono::Utc;

use crate::events::{utc_timestamp, EventSink, PublishedEvent, PUBLISHER_DESTROYED};
use crate::identity::ParticipantIdentity;
use crate::security::keystore::KeyMaterial;
use crate::upstream::poller::PolledReading;

pub struct EventPublisher {
    sink: Arc<dyn EventSink>,
    identity: ParticipantIdentity,
    /// Present only when transport encryption is on.
    own_key: Option<Arc<KeyMaterial>>,
}

impl EventPublisher {
    pub fn new(
        sink: Arc<dyn EventSink>,
        identity: ParticipantIdentity,
        own_key: Option<Arc<KeyMaterial>>,
    ) -> Self {
        Self { sink, identity, own_key }
    }

    /// Event for `reading`, stamped with the current wall clock.
    pub fn build_event(&self, reading: &PolledReading) -> PublishedEvent {
        PublishedEvent {
            event_type: PUBLISHER_DESTROYED.to_owned(),
            source: self.identity.snapshot(self.own_key.as_deref()),
            metadata: None,
            payload: reading.value.clone(),
            time_stamp: utc_timestamp(Utc::now()),
        }
    }

    /// Build and submit one event. Sink errors are returned, not logged.
    pub async fn publish(&self, reading: &PolledReading) -> anyhow::Result<PublishedEvent> {
        let event = self.build_event(reading);
        self.sink.publish(&event).await?;
        Ok(event)
    }
}

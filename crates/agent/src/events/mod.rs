// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Published events and the event-distribution contract.

pub mod http;
pub mod publisher;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::ParticipantIdentity;
use crate::BoxFuture;

/// Event type of every event this agent publishes, periodic or final.
pub const PUBLISHER_DESTROYED: &str = "PUBLISHER_DESTROYED";

/// Event submitted to the event-distribution service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedEvent {
    pub event_type: String,
    pub source: ParticipantIdentity,
    pub metadata: Option<BTreeMap<String, String>>,
    pub payload: String,
    pub time_stamp: String,
}

/// Contract of the event-distribution collaborator.
pub trait EventSink: Send + Sync {
    fn reachable(&self) -> BoxFuture<'_, bool>;

    /// Re-resolve where events are submitted.
    fn refresh_endpoints(&self) -> BoxFuture<'_, anyhow::Result<()>>;

    fn publish<'a>(&'a self, event: &'a PublishedEvent) -> BoxFuture<'a, anyhow::Result<()>>;
}

/// Format `at` as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn utc_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

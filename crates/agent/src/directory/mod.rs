// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory (service registry) contract and wire records.

pub mod client;
pub mod target;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::ParticipantIdentity;
use crate::security::SecurityMode;
use crate::BoxFuture;

/// A directory record advertising one operation this participant offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    pub service_definition: String,
    pub provider_system: ParticipantIdentity,
    pub service_uri: String,
    pub secure: SecurityMode,
    pub metadata: BTreeMap<String, String>,
    pub interfaces: Vec<String>,
}

impl CapabilityDescriptor {
    /// Records with equal keys replace each other in the directory.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.service_definition, &self.service_uri, &self.provider_system.system_name)
    }
}

/// Where a core service can be reached, as resolved by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub base_url: String,
    pub service_uri: String,
}

impl ServiceEndpoint {
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.service_uri)
    }
}

/// Contract of the directory collaborator.
pub trait Directory: Send + Sync {
    fn reachable(&self) -> BoxFuture<'_, bool>;

    /// Register `descriptor`, replacing any record with the same key.
    fn upsert<'a>(
        &'a self,
        descriptor: &'a CapabilityDescriptor,
    ) -> BoxFuture<'a, anyhow::Result<()>>;

    /// Remove a registration. A missing record is not an error.
    fn delete<'a>(
        &'a self,
        definition: &'a str,
        uri: &'a str,
        provider: &'a ParticipantIdentity,
    ) -> BoxFuture<'a, anyhow::Result<()>>;

    /// Resolve the first provider of `definition`, if any.
    fn lookup<'a>(
        &'a self,
        definition: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Option<ServiceEndpoint>>>;
}

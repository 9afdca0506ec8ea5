// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability registration: descriptor construction and directory submission.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::directory::{CapabilityDescriptor, Directory};
use crate::identity::ParticipantIdentity;
use crate::security::keystore::KeyMaterial;
use crate::security::SecurityMode;

pub const CAR_URI: &str = "/car";
pub const CREATE_CAR_SERVICE_DEFINITION: &str = "create-car";
pub const GET_CAR_SERVICE_DEFINITION: &str = "get-car";

pub const HTTP_METHOD: &str = "http-method";
pub const REQUEST_PARAM_KEY_BRAND: &str = "request-param-brand";
pub const REQUEST_PARAM_BRAND: &str = "brand";
pub const REQUEST_PARAM_KEY_COLOR: &str = "request-param-color";
pub const REQUEST_PARAM_COLOR: &str = "color";

/// One operation this participant offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub definition: &'static str,
    pub uri: &'static str,
    pub method: &'static str,
    /// Metadata beyond the `http-method` entry every descriptor carries.
    pub metadata: &'static [(&'static str, &'static str)],
}

/// The capabilities registered at startup, in registration order.
pub const OFFERED_CAPABILITIES: [Capability; 2] = [
    Capability {
        definition: CREATE_CAR_SERVICE_DEFINITION,
        uri: CAR_URI,
        method: "POST",
        metadata: &[],
    },
    Capability {
        definition: GET_CAR_SERVICE_DEFINITION,
        uri: CAR_URI,
        method: "GET",
        metadata: &[
            (REQUEST_PARAM_KEY_BRAND, REQUEST_PARAM_BRAND),
            (REQUEST_PARAM_KEY_COLOR, REQUEST_PARAM_COLOR),
        ],
    },
];

/// Builds capability descriptors and submits them to the directory.
pub struct RegistrationClient {
    directory: Arc<dyn Directory>,
    identity: ParticipantIdentity,
    mode: SecurityMode,
    own_key: Option<Arc<KeyMaterial>>,
}

impl RegistrationClient {
    pub fn new(
        directory: Arc<dyn Directory>,
        identity: ParticipantIdentity,
        mode: SecurityMode,
        own_key: Option<Arc<KeyMaterial>>,
    ) -> Self {
        Self { directory, identity, mode, own_key }
    }

    /// Descriptor for `capability` under the configured security mode.
    pub fn build_descriptor(&self, capability: &Capability) -> CapabilityDescriptor {
        let provider_system = if self.mode.attaches_public_key() {
            self.identity.snapshot(self.own_key.as_deref())
        } else {
            self.identity.snapshot(None)
        };

        let mut metadata = BTreeMap::new();
        metadata.insert(HTTP_METHOD.to_owned(), capability.method.to_owned());
        for (key, value) in capability.metadata {
            metadata.insert((*key).to_owned(), (*value).to_owned());
        }

        CapabilityDescriptor {
            service_definition: capability.definition.to_owned(),
            provider_system,
            service_uri: capability.uri.to_owned(),
            secure: self.mode,
            metadata,
            interfaces: vec![self.mode.interface().to_owned()],
        }
    }

    /// Forced (upsert) registration of `descriptor`.
    pub async fn register_capability(
        &self,
        descriptor: &CapabilityDescriptor,
    ) -> anyhow::Result<()> {
        match self.directory.upsert(descriptor).await {
            Ok(()) => {
                tracing::info!(
                    definition = %descriptor.service_definition,
                    uri = %descriptor.service_uri,
                    secure = %descriptor.secure,
                    "capability registered"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    definition = %descriptor.service_definition,
                    err = %e,
                    "capability registration failed"
                );
                Err(e)
            }
        }
    }

    /// Best-effort removal of a registration; failures are logged only.
    pub async fn deregister_capability(&self, definition: &str, uri: &str) {
        match self.directory.delete(definition, uri, &self.identity).await {
            Ok(()) => tracing::info!(definition, uri, "capability deregistered"),
            Err(e) => tracing::warn!(definition, uri, err = %e, "capability deregistration failed"),
        }
    }
}

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;

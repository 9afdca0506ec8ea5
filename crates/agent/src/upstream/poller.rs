// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polls the data source and extracts the published reading.
//!
//! A poll never fails: transport errors, malformed bodies, and missing
//! records all degrade to the sentinel value.

use std::sync::Arc;

use serde_json::Value;

use crate::upstream::client::DataSource;

/// Value published when no reading could be extracted.
pub const SENTINEL: &str = "0";

/// Result of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolledReading {
    /// Response body as received; empty when the request itself failed.
    pub raw_body: String,
    pub value: String,
}

impl PolledReading {
    pub fn sentinel(raw_body: String) -> Self {
        Self { raw_body, value: SENTINEL.to_owned() }
    }

    pub fn is_sentinel(&self) -> bool {
        self.value == SENTINEL
    }
}

/// Reads submodel records and picks the target record's value.
pub struct ExternalPoller {
    source: Arc<dyn DataSource>,
    target: String,
}

impl ExternalPoller {
    pub fn new(source: Arc<dyn DataSource>, target: impl Into<String>) -> Self {
        Self { source, target: target.into() }
    }

    pub async fn poll_reading(&self) -> PolledReading {
        let body = match self.source.fetch().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(err = %e, "data source request failed");
                return PolledReading::sentinel(String::new());
            }
        };
        tracing::debug!(body = %body, "data source response");

        match extract_value(&body, &self.target) {
            Some(value) => {
                tracing::info!(id_short = %self.target, value = %value, "reading extracted");
                PolledReading { raw_body: body, value }
            }
            None => PolledReading::sentinel(body),
        }
    }
}

/// Value of the first record whose `idShort` equals `target` ignoring case.
///
/// The value is read as text: a missing, object or array `value` gives an
/// empty string and JSON `null` gives `"null"`. Returns `None` for malformed
/// JSON, a non-array or empty body, or no matching record.
pub fn extract_value(body: &str, target: &str) -> Option<String> {
    let root: Value = match serde_json::from_str(body) {
        Ok(root) => root,
        Err(e) => {
            tracing::error!(err = %e, "error parsing data source response");
            return None;
        }
    };

    let records = match root.as_array() {
        Some(records) if !records.is_empty() => records,
        _ => {
            tracing::warn!("no submodel found in the response");
            return None;
        }
    };

    let Some(record) = records.iter().find(|record| {
        record
            .get("idShort")
            .and_then(Value::as_str)
            .is_some_and(|id| id.eq_ignore_ascii_case(target))
    }) else {
        tracing::warn!(id_short = target, "no submodel matches target");
        return None;
    };

    Some(value_as_text(record.get("value")))
}

fn value_as_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => v.to_string(),
        Some(Value::Array(_) | Value::Object(_)) | None => String::new(),
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;

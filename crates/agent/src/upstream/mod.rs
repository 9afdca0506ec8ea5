// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External data source: HTTP fetch and reading extraction.

pub mod client;
pub mod poller;

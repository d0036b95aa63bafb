// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait shared by pluggable backends.

use async_trait::async_trait;

use crate::error::PlantwiseError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and lifecycle shared by the model backend and session stores.
///
/// `plantwise check` calls [`health_check`](Self::health_check) on each
/// configured adapter.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short identifier used in logs, e.g. `"gemini"` or `"json-file"`.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Reports readiness without side effects on the conversation.
    async fn health_check(&self) -> Result<HealthStatus, PlantwiseError>;

    /// Flushes pending state and drops held resources.
    async fn shutdown(&self) -> Result<(), PlantwiseError>;
}

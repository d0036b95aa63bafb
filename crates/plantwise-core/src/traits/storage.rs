// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-scoped key/value persistence.

use async_trait::async_trait;

use crate::error::PlantwiseError;
use crate::traits::adapter::PluginAdapter;

/// Well-known key under which the displayed conversation history is stored.
pub const HISTORY_KEY: &str = "chat_history";

/// Well-known key under which the audit log is stored.
pub const AUDIT_KEY: &str = "audit_log";

/// Adapter for session-scoped storage (browser-session semantics).
///
/// Values are opaque serialized strings.
#[async_trait]
pub trait SessionStore: PluginAdapter {
    /// Reads a value, `None` if the key was never written or was removed.
    async fn get(&self, key: &str) -> Result<Option<String>, PlantwiseError>;

    /// Writes a value, replacing any previous one.
    async fn put(&self, key: &str, value: String) -> Result<(), PlantwiseError>;

    /// Deletes a value. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), PlantwiseError>;
}

// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Backends extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod document;
pub mod model;
pub mod storage;

pub use adapter::PluginAdapter;
pub use document::DocumentStore;
pub use model::ModelBackend;
pub use storage::{AUDIT_KEY, HISTORY_KEY, SessionStore};

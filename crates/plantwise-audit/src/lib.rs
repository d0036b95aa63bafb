// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-scoped audit log with compliance tagging and a SHA-256 hash chain.
//!
//! Every guardrail decision, retrieval, tool call and response is recorded as
//! an [`AuditEntry`]. Entries are kept newest first in a capped buffer and
//! mirrored to a [`SessionStore`](plantwise_core::SessionStore) after each insert.

pub mod chain;
pub mod classify;
pub mod log;
pub mod types;

pub use chain::{ChainBreak, GENESIS_HASH, compute_hash, verify_chain};
pub use classify::classify;
pub use log::{AuditLog, DEFAULT_CAPACITY};
pub use types::{Actor, AuditAction, AuditEntry, AuditStatus, ComplianceStandard};

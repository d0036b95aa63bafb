// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Plantwise RAG assistant.

use thiserror::Error;

/// The primary error type used across all Plantwise adapter traits and core operations.
///
/// Policy refusals and backend failures during a conversation turn are NOT
/// errors: they degrade to an assistant message. This type covers API misuse,
/// adapter failures seen by the adapters themselves, and configuration.
#[derive(Debug, Error)]
pub enum PlantwiseError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Session-scoped persistence errors (serialization, file I/O).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Model backend errors (API failure, malformed response, unknown session).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A tool call could not be executed (malformed arguments, invalid enum value).
    #[error("tool error: {message}")]
    Tool { message: String },

    /// Input failed a semantic check.
    #[error("validation error: {0}")]
    Validation(String),

    /// A knowledge document with the same title (case-insensitive) already exists.
    #[error("a document titled `{title}` already exists")]
    DuplicateTitle { title: String },

    /// Lookup by id found nothing.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Operation is not valid in the current session state.
    #[error("invalid session state: expected {expected}, found {found}")]
    SessionState { expected: String, found: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The operation was invalidated by a session reset.
    #[error("operation cancelled by session reset")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PlantwiseError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        PlantwiseError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a tool error.
    pub fn tool(message: impl Into<String>) -> Self {
        PlantwiseError::Tool {
            message: message.into(),
        }
    }

    /// Wraps any error as a storage error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PlantwiseError::Storage {
            source: Box::new(err),
        }
    }
}

// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Plantwise RAG assistant.
//!
//! This crate provides the error type, the domain types and the adapter
//! traits shared by every other crate in the workspace.

pub mod error;
pub mod traits;
pub mod types;

pub use error::PlantwiseError;
pub use types::{
    AdapterType, Category, ConversationMessage, Feedback, FunctionCall, HealthStatus,
    KnowledgeDocument, MediaKind, MediaPayload, MediaRef, ModelReply, ModelRole,
    ModelSessionConfig, ModelTurn, Priority, PromptPart, QuizOption, RefusalReason, Role,
    SessionHandle, SubmitResult, TelemetryReading, TelemetryStatus, Ticket, TicketStatus,
    ToolDeclaration, WELCOME_MESSAGE_ID, Widget,
};

pub use traits::{
    AUDIT_KEY, DocumentStore, HISTORY_KEY, ModelBackend, PluginAdapter, SessionStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plantwise_error_variants_render() {
        let cases: Vec<(PlantwiseError, &str)> = vec![
            (PlantwiseError::Config("bad".into()), "configuration error: bad"),
            (
                PlantwiseError::storage(std::io::Error::other("disk")),
                "storage error: disk",
            ),
            (PlantwiseError::provider("503"), "provider error: 503"),
            (PlantwiseError::tool("no priority"), "tool error: no priority"),
            (
                PlantwiseError::DuplicateTitle {
                    title: "Press".into(),
                },
                "a document titled `Press` already exists",
            ),
            (
                PlantwiseError::NotFound {
                    kind: "message",
                    id: "m1".into(),
                },
                "message not found: m1",
            ),
            (
                PlantwiseError::SessionState {
                    expected: "Ready".into(),
                    found: "Uninitialized".into(),
                },
                "invalid session state: expected Ready, found Uninitialized",
            ),
            (PlantwiseError::Cancelled, "operation cancelled by session reset"),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn adapter_type_display_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Model, AdapterType::SessionStore] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn timeout_error_mentions_duration() {
        let err = PlantwiseError::Timeout {
            duration: std::time::Duration::from_secs(60),
        };
        assert!(err.to_string().contains("60s"));
    }
}

// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation session and RAG engine for the Plantwise assistant.
//!
//! [`RagEngine`] wires the guardrail, knowledge base, audit log, tool
//! dispatcher and model backend around one [`ConversationSession`].

pub mod engine;
pub mod gaps;
pub mod policy;
pub mod response;
pub mod session;

pub use engine::RagEngine;
pub use gaps::{KnowledgeGap, KnowledgeGapQueue};
pub use policy::is_meta_query;
pub use response::{BACKEND_APOLOGY, CHECKLIST_TITLE, KNOWLEDGE_GAP_REFUSAL, POLICY_REFUSAL};
pub use session::{ConversationSession, SessionServices, SessionSettings, SessionState};

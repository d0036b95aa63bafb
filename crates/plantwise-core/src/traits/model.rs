// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model backend trait for hosted LLM chat sessions with function calling.

use async_trait::async_trait;

use crate::error::PlantwiseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ModelReply, ModelSessionConfig, PromptPart, SessionHandle};

/// Adapter for a chat-capable model with tool (function) calling.
///
/// A backend keeps the conversation contents for each open session, so the
/// caller only sends the new turn.
#[async_trait]
pub trait ModelBackend: PluginAdapter {
    /// Opens a chat session seeded with the given instruction, tools and history.
    async fn create_session(
        &self,
        config: ModelSessionConfig,
    ) -> Result<SessionHandle, PlantwiseError>;

    /// Sends one user turn and returns the model's reply.
    async fn send(
        &self,
        handle: &SessionHandle,
        parts: Vec<PromptPart>,
    ) -> Result<ModelReply, PlantwiseError>;

    /// Feeds the result of a function call back into the session and returns
    /// the model's follow-up. Function calls in the follow-up are not run.
    async fn send_tool_result(
        &self,
        handle: &SessionHandle,
        name: &str,
        result: serde_json::Value,
    ) -> Result<ModelReply, PlantwiseError>;

    /// Discards a session. Unknown handles are ignored.
    async fn close_session(&self, handle: &SessionHandle) -> Result<(), PlantwiseError>;
}

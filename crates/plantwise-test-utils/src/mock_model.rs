// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model backend for deterministic testing.
//!
//! `MockModel` implements `ModelBackend` with queued replies and records
//! every session, prompt and tool result it receives.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use plantwise_core::{
    AdapterType, HealthStatus, ModelBackend, ModelReply, ModelSessionConfig, PlantwiseError,
    PluginAdapter, PromptPart, SessionHandle,
};

/// A mock model that replays queued replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a
/// "mock response" text reply is returned. A queued `Err` makes that `send`
/// fail with a provider error.
#[derive(Default)]
pub struct MockModel {
    replies: Mutex<VecDeque<Result<ModelReply, String>>>,
    delay: Mutex<Option<Duration>>,
    fail_sessions: AtomicBool,
    sessions: Mutex<Vec<ModelSessionConfig>>,
    closed: Mutex<Vec<SessionHandle>>,
    prompts: Mutex<Vec<Vec<PromptPart>>>,
    tool_results: Mutex<Vec<(String, serde_json::Value)>>,
    tool_follow_up: Mutex<Option<String>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock pre-loaded with text-only replies.
    pub fn with_texts(texts: &[&str]) -> Self {
        let model = Self::new();
        if let Ok(mut replies) = model.replies.try_lock() {
            replies.extend(texts.iter().map(|t| Ok(ModelReply::text(*t))));
        }
        model
    }

    pub async fn push_reply(&self, reply: ModelReply) {
        self.replies.lock().await.push_back(Ok(reply));
    }

    pub async fn push_text(&self, text: &str) {
        self.push_reply(ModelReply::text(text)).await;
    }

    /// Makes the next unanswered `send` fail.
    pub async fn push_failure(&self, message: &str) {
        self.replies.lock().await.push_back(Err(message.to_string()));
    }

    /// Text the model answers every tool result with. Empty by default.
    pub async fn set_tool_follow_up(&self, text: Option<&str>) {
        *self.tool_follow_up.lock().await = text.map(str::to_string);
    }

    /// Delays every `send` by `delay`.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().await = delay;
    }

    /// Makes `create_session` fail until switched off.
    pub fn fail_sessions(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }

    /// Number of `send` calls so far.
    pub async fn send_count(&self) -> usize {
        self.prompts.lock().await.len()
    }

    pub async fn prompts(&self) -> Vec<Vec<PromptPart>> {
        self.prompts.lock().await.clone()
    }

    /// Text of the last prompt's first part.
    pub async fn last_prompt_text(&self) -> Option<String> {
        self.prompts.lock().await.last().and_then(|parts| {
            parts.iter().find_map(|p| match p {
                PromptPart::Text(t) => Some(t.clone()),
                PromptPart::InlineImage { .. } => None,
            })
        })
    }

    pub async fn sessions(&self) -> Vec<ModelSessionConfig> {
        self.sessions.lock().await.clone()
    }

    pub async fn closed_sessions(&self) -> Vec<SessionHandle> {
        self.closed.lock().await.clone()
    }

    pub async fn tool_results(&self) -> Vec<(String, serde_json::Value)> {
        self.tool_results.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockModel {
    fn name(&self) -> &str {
        "mock-model"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Model
    }

    async fn health_check(&self) -> Result<HealthStatus, PlantwiseError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PlantwiseError> {
        Ok(())
    }
}

#[async_trait]
impl ModelBackend for MockModel {
    async fn create_session(
        &self,
        config: ModelSessionConfig,
    ) -> Result<SessionHandle, PlantwiseError> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            return Err(PlantwiseError::provider("mock session unavailable"));
        }
        self.sessions.lock().await.push(config);
        Ok(SessionHandle(format!("mock-{}", uuid::Uuid::new_v4())))
    }

    async fn send(
        &self,
        _handle: &SessionHandle,
        parts: Vec<PromptPart>,
    ) -> Result<ModelReply, PlantwiseError> {
        self.prompts.lock().await.push(parts);

        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.replies.lock().await.pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(PlantwiseError::provider(message)),
            None => Ok(ModelReply::text("mock response")),
        }
    }

    async fn send_tool_result(
        &self,
        _handle: &SessionHandle,
        name: &str,
        result: serde_json::Value,
    ) -> Result<ModelReply, PlantwiseError> {
        self.tool_results
            .lock()
            .await
            .push((name.to_string(), result));
        let text = self.tool_follow_up.lock().await.clone().unwrap_or_default();
        Ok(ModelReply::text(text))
    }

    async fn close_session(&self, handle: &SessionHandle) -> Result<(), PlantwiseError> {
        self.closed.lock().await.push(handle.clone());
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation FSM that drives one query through the RAG pipeline.
//!
//! States: Uninitialized -> Ready -> AwaitingModel -> Ready, with Error
//! entered only when the model session cannot be opened. `reset` returns to
//! Uninitialized from any state.
//!
//! A turn runs: guardrail, PII scrub, user message append, retrieval,
//! closed-system check, prompt assembly, model call, tool dispatch, reply
//! post-processing. Every step is audited.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use plantwise_audit::{Actor, AuditAction, AuditLog, AuditStatus};
use plantwise_config::PlantwiseConfig;
use plantwise_context::{ImageAttachment, SystemInstruction, assemble};
use plantwise_core::{
    ConversationMessage, Feedback, HISTORY_KEY, KnowledgeDocument, ModelBackend, ModelReply,
    ModelRole, ModelSessionConfig, ModelTurn, PlantwiseError, PromptPart, RefusalReason, Role,
    SessionHandle, SessionStore, SubmitResult,
};
use plantwise_guard::Guardrail;
use plantwise_retrieval::KnowledgeBase;
use plantwise_skill::{ToolContext, ToolDispatcher, ToolEffects};
use strum::Display;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::gaps::KnowledgeGapQueue;
use crate::policy::may_answer;
use crate::response::{
    BACKEND_APOLOGY, KNOWLEDGE_GAP_REFUSAL, POLICY_REFUSAL, extract_clarification,
    synthesize_checklist, welcome_text,
};

/// States in the session FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    /// No model session yet, or reset.
    Uninitialized,
    /// Accepting queries.
    Ready,
    /// A model call is in flight.
    AwaitingModel,
    /// The model session could not be opened. `initialize` may be retried.
    Error,
}

/// Tunables of a conversation session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub temperature: f32,
    /// Identical user messages inside this window are treated as retries.
    pub retry_window: Duration,
    pub model_timeout: Duration,
    pub welcome: String,
}

impl SessionSettings {
    pub fn from_config(config: &PlantwiseConfig) -> Self {
        Self {
            temperature: config.gemini.temperature,
            retry_window: Duration::from_secs(config.session.retry_window_secs),
            model_timeout: Duration::from_secs(config.session.model_timeout_secs),
            welcome: welcome_text(&config.assistant.name),
        }
    }
}

/// Collaborators shared by the session and the engine.
pub struct SessionServices {
    pub backend: Arc<dyn ModelBackend>,
    pub guardrail: Guardrail,
    pub knowledge: Arc<KnowledgeBase>,
    pub dispatcher: ToolDispatcher,
    pub audit: Arc<AuditLog>,
    pub store: Arc<dyn SessionStore>,
    pub gaps: Arc<KnowledgeGapQueue>,
    pub instruction: SystemInstruction,
    pub settings: SessionSettings,
}

impl SessionServices {
    async fn audit(
        &self,
        actor: Actor,
        action: AuditAction,
        details: impl Into<String>,
        status: AuditStatus,
    ) {
        self.audit.record(actor, action, details, status, None).await;
    }
}

/// One conversation: displayed history plus the model session behind it.
pub struct ConversationSession {
    services: Arc<SessionServices>,
    state: SessionState,
    handle: Option<SessionHandle>,
    messages: Vec<ConversationMessage>,
    /// Turns held by the model session, including seeded history.
    model_turns: usize,
    persistence_degraded: bool,
}

impl ConversationSession {
    pub fn new(services: Arc<SessionServices>) -> Self {
        let welcome = ConversationMessage::welcome(services.settings.welcome.clone());
        Self {
            services,
            state: SessionState::Uninitialized,
            handle: None,
            messages: vec![welcome],
            model_turns: 0,
            persistence_degraded: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Displayed history, oldest first.
    pub fn history(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// True once the model session holds a prior exchange.
    pub fn has_history(&self) -> bool {
        self.model_turns > 1
    }

    /// Opens a model session seeded with `prior`.
    ///
    /// The displayed history becomes `prior`, or the welcome message when
    /// `prior` is empty. On failure the session enters `Error`.
    pub async fn initialize(
        &mut self,
        prior: Vec<ConversationMessage>,
    ) -> Result<(), PlantwiseError> {
        self.close_model_session().await;

        let history = model_history(&prior);
        self.messages = if prior.is_empty() {
            vec![self.welcome()]
        } else {
            prior
        };

        let turns = history.len();
        let config = ModelSessionConfig {
            system_instruction: self.services.instruction.text().to_string(),
            temperature: self.services.settings.temperature,
            tools: self.services.dispatcher.declarations(),
            history,
        };

        match self.services.backend.create_session(config).await {
            Ok(handle) => {
                info!(session = %handle.0, turns, "conversation session ready");
                self.handle = Some(handle);
                self.model_turns = turns;
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to open model session");
                self.state = SessionState::Error;
                Err(e)
            }
        }
    }

    /// Runs one user query through the pipeline.
    ///
    /// Refusals and backend failures are returned as `Ok` results carrying a
    /// refusal marker. `Err` means misuse (not Ready) or cancellation by
    /// `cancel`, in which case history is left as it was before the model call.
    pub async fn submit(
        &mut self,
        query: &str,
        image: Option<ImageAttachment>,
        cancel: &CancellationToken,
    ) -> Result<SubmitResult, PlantwiseError> {
        if self.state != SessionState::Ready {
            return Err(PlantwiseError::SessionState {
                expected: SessionState::Ready.to_string(),
                found: self.state.to_string(),
            });
        }
        let svc = Arc::clone(&self.services);
        self.persistence_degraded = false;

        if let Some(phrase) = svc.guardrail.detect_injection(query) {
            warn!(phrase, "prompt injection blocked");
            svc.audit(
                Actor::Guardrail,
                AuditAction::SecurityBlock,
                format!("Prompt injection detected: \"{phrase}\""),
                AuditStatus::Blocked,
            )
            .await;
            let mut result = SubmitResult::refusal(POLICY_REFUSAL, RefusalReason::PolicyViolation);
            result.persistence_degraded = self.take_degraded();
            return Ok(result);
        }

        let scrubbed = svc.guardrail.scrub(query);
        if scrubbed.was_redacted {
            svc.audit(
                Actor::Guardrail,
                AuditAction::Query,
                "PII data redacted from user query",
                AuditStatus::Warning,
            )
            .await;
        } else {
            svc.audit(
                Actor::User,
                AuditAction::Query,
                "User input received",
                AuditStatus::Success,
            )
            .await;
        }
        let clean = scrubbed.text;

        self.append_user(&clean, image.as_ref()).await;

        let docs = svc.knowledge.retrieve(&clean).await?;
        svc.audit(
            Actor::System,
            AuditAction::DataRetrieval,
            format!("Retrieved {} documents", docs.len()),
            AuditStatus::Success,
        )
        .await;

        let sources = source_titles(&docs);
        let media = docs.iter().find_map(KnowledgeDocument::media_payload);
        let has_history = self.has_history();

        if !may_answer(!docs.is_empty(), &clean, image.is_some(), has_history) {
            info!("no internal data for query, model not consulted");
            svc.audit(
                Actor::System,
                AuditAction::KnowledgeGap,
                format!("No internal data for: {clean}"),
                AuditStatus::Blocked,
            )
            .await;
            svc.gaps.push(clean).await;

            let mut message = ConversationMessage::model(KNOWLEDGE_GAP_REFUSAL);
            message.refusal = Some(RefusalReason::KnowledgeGap);
            let message_id = message.id.clone();
            self.messages.push(message);
            self.persist_history().await;

            let mut result = SubmitResult::refusal(KNOWLEDGE_GAP_REFUSAL, RefusalReason::KnowledgeGap);
            result.message_id = Some(message_id);
            result.persistence_degraded = self.take_degraded();
            return Ok(result);
        }

        let handle = self.handle.clone().ok_or_else(|| {
            PlantwiseError::Internal("ready session has no model handle".into())
        })?;
        let parts = assemble(&clean, &docs, image.as_ref(), has_history);
        let timeout = svc.settings.model_timeout;

        self.state = SessionState::AwaitingModel;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("model call abandoned after reset");
                return Err(PlantwiseError::Cancelled);
            }
            result = tokio::time::timeout(timeout, exchange(&svc, &handle, parts, &docs)) => {
                result.unwrap_or_else(|_| Err(PlantwiseError::Timeout { duration: timeout }))
            }
        };
        self.state = SessionState::Ready;

        let (reply, effects) = match outcome {
            Ok(exchanged) => exchanged,
            Err(e) => {
                warn!(error = %e, "model call failed");
                svc.audit(
                    Actor::System,
                    AuditAction::Response,
                    format!("API error: {e}"),
                    AuditStatus::Blocked,
                )
                .await;
                return Ok(SubmitResult {
                    text: BACKEND_APOLOGY.to_string(),
                    sources,
                    created_ticket: None,
                    media,
                    widget: None,
                    is_clarification: false,
                    refusal: Some(RefusalReason::BackendFailure),
                    persistence_degraded: self.take_degraded(),
                    message_id: None,
                });
            }
        };
        self.model_turns += 2;

        let reply_text = match effects.follow_up.as_deref() {
            Some(follow_up) if reply.text.trim().is_empty() => follow_up,
            _ => reply.text.as_str(),
        };
        let (text, is_clarification) = extract_clarification(reply_text);
        let widget = effects.widget.or_else(|| synthesize_checklist(&text));

        let mut message = ConversationMessage::model(text.clone());
        message.sources = sources.clone();
        message.ticket = effects.ticket.clone();
        message.media = media.clone();
        message.widget = widget.clone();
        message.is_clarification = is_clarification;
        let message_id = message.id.clone();
        self.messages.push(message);
        self.persist_history().await;

        svc.audit(
            Actor::System,
            AuditAction::Response,
            "Response generated from knowledge base",
            AuditStatus::Success,
        )
        .await;
        info!(
            sources = sources.len(),
            clarification = is_clarification,
            ticket = effects.ticket.is_some(),
            "reply ready"
        );

        Ok(SubmitResult {
            text,
            sources,
            created_ticket: effects.ticket,
            media,
            widget,
            is_clarification,
            refusal: None,
            persistence_degraded: self.take_degraded(),
            message_id: Some(message_id),
        })
    }

    /// Rates a message in the displayed history.
    pub async fn submit_feedback(
        &mut self,
        message_id: &str,
        positive: bool,
    ) -> Result<(), PlantwiseError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| PlantwiseError::NotFound {
                kind: "message",
                id: message_id.to_string(),
            })?;
        message.feedback = Some(if positive {
            Feedback::Positive
        } else {
            Feedback::Negative
        });
        self.persist_history().await;

        let verdict = if positive { "POSITIVE" } else { "NEGATIVE" };
        self.services
            .audit(
                Actor::User,
                AuditAction::UserFeedback,
                format!("Feedback for message {message_id}: {verdict}"),
                AuditStatus::Success,
            )
            .await;
        Ok(())
    }

    /// Discards the model session, the history (displayed and persisted) and
    /// the audit log.
    pub async fn reset(&mut self) {
        self.close_model_session().await;
        self.messages = vec![self.welcome()];
        self.model_turns = 0;
        if let Err(e) = self.services.store.remove(HISTORY_KEY).await {
            warn!(error = %e, "persisted chat history could not be removed");
        }
        self.services.audit.clear().await;
        self.state = SessionState::Uninitialized;
        info!("conversation session reset");
    }

    fn welcome(&self) -> ConversationMessage {
        ConversationMessage::welcome(self.services.settings.welcome.clone())
    }

    async fn close_model_session(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.services.backend.close_session(&handle).await {
                warn!(session = %handle.0, error = %e, "failed to close model session");
            }
        }
    }

    /// Appends the user message unless it repeats one sent inside the retry window.
    async fn append_user(&mut self, text: &str, image: Option<&ImageAttachment>) {
        let window =
            TimeDelta::from_std(self.services.settings.retry_window).unwrap_or(TimeDelta::zero());
        let now = Utc::now();
        let is_retry = self
            .messages
            .iter()
            .rev()
            .take_while(|m| now - m.timestamp <= window)
            .any(|m| m.role == Role::User && m.text == text);
        if is_retry {
            debug!("retried query, user message not duplicated");
            return;
        }

        self.messages.push(ConversationMessage::user(
            text,
            image.map(|i| i.data.clone()),
        ));
        self.persist_history().await;
    }

    async fn persist_history(&mut self) {
        let result = match serde_json::to_string(&self.messages) {
            Ok(json) => self.services.store.put(HISTORY_KEY, json).await,
            Err(e) => Err(PlantwiseError::Internal(format!(
                "chat history serialization failed: {e}"
            ))),
        };
        if let Err(e) = result {
            warn!(error = %e, "chat history could not be persisted");
            self.persistence_degraded = true;
        }
    }

    fn take_degraded(&mut self) -> bool {
        let audit_degraded = self.services.audit.take_storage_warning().is_some();
        std::mem::take(&mut self.persistence_degraded) || audit_degraded
    }
}

/// Sends the prompt and runs any tool calls in the reply.
async fn exchange(
    svc: &SessionServices,
    handle: &SessionHandle,
    parts: Vec<PromptPart>,
    docs: &[KnowledgeDocument],
) -> Result<(ModelReply, ToolEffects), PlantwiseError> {
    let reply = svc.backend.send(handle, parts).await?;
    let effects = if reply.function_calls.is_empty() {
        ToolEffects::default()
    } else {
        svc.dispatcher
            .dispatch(
                svc.backend.as_ref(),
                handle,
                &reply.function_calls,
                ToolContext { documents: docs },
            )
            .await?
    };
    Ok((reply, effects))
}

/// Model-native history for a displayed conversation.
///
/// System notices and the welcome message are dropped, and the history
/// starts at the first user message.
pub fn model_history(messages: &[ConversationMessage]) -> Vec<ModelTurn> {
    let chat: Vec<&ConversationMessage> = messages
        .iter()
        .filter(|m| m.role != Role::System && !m.is_welcome())
        .collect();
    let Some(first_user) = chat.iter().position(|m| m.role == Role::User) else {
        return Vec::new();
    };

    chat[first_user..]
        .iter()
        .map(|m| {
            let role = if m.role == Role::User {
                ModelRole::User
            } else {
                ModelRole::Model
            };
            ModelTurn::text(role, m.text.clone())
        })
        .collect()
}

/// Titles of `docs`, de-duplicated, in rank order.
pub fn source_titles(docs: &[KnowledgeDocument]) -> Vec<String> {
    let mut titles: Vec<String> = Vec::with_capacity(docs.len());
    for doc in docs {
        if !titles.contains(&doc.title) {
            titles.push(doc.title.clone());
        }
    }
    titles
}

/// Loads persisted history. Missing or unreadable history is empty.
pub async fn load_history(store: &dyn SessionStore) -> Vec<ConversationMessage> {
    match store.get(HISTORY_KEY).await {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "persisted chat history is corrupt, starting fresh");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "chat history could not be read");
            Vec::new()
        }
    }
}

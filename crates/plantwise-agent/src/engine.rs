// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The RAG engine: owns every collaborator and one conversation session.

use std::sync::{Arc, Mutex as StdMutex};

use plantwise_audit::{Actor, AuditAction, AuditEntry, AuditLog, AuditStatus, ChainBreak};
use plantwise_config::PlantwiseConfig;
use plantwise_context::{ImageAttachment, SystemInstruction};
use plantwise_core::{
    ConversationMessage, ModelBackend, PlantwiseError, RefusalReason, SessionStore,
    SubmitResult, Ticket,
};
use plantwise_guard::Guardrail;
use plantwise_retrieval::KnowledgeBase;
use plantwise_skill::{TicketBoard, ToolDispatcher, default_registry};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::gaps::{KnowledgeGap, KnowledgeGapQueue};
use crate::response::BACKEND_APOLOGY;
use crate::session::{
    ConversationSession, SessionServices, SessionSettings, SessionState, load_history,
};

/// Entry point for callers.
///
/// Submits are serialized: a second submit waits for the first. `reset`
/// cancels the in-flight submit so its reply is never appended.
pub struct RagEngine {
    services: Arc<SessionServices>,
    tickets: Arc<TicketBoard>,
    session: Mutex<ConversationSession>,
    generation: StdMutex<CancellationToken>,
}

impl RagEngine {
    /// Wires an engine from configuration and its adapters.
    pub async fn new(
        config: &PlantwiseConfig,
        backend: Arc<dyn ModelBackend>,
        store: Arc<dyn SessionStore>,
        knowledge: Arc<KnowledgeBase>,
    ) -> Self {
        let instruction = SystemInstruction::load(&config.assistant).await;
        Self::with_instruction(config, backend, store, knowledge, instruction)
    }

    /// Like [`RagEngine::new`] with an already-loaded system instruction.
    pub fn with_instruction(
        config: &PlantwiseConfig,
        backend: Arc<dyn ModelBackend>,
        store: Arc<dyn SessionStore>,
        knowledge: Arc<KnowledgeBase>,
        instruction: SystemInstruction,
    ) -> Self {
        let tickets = Arc::new(TicketBoard::new());
        let audit = Arc::new(AuditLog::with_store(config.audit.capacity, store.clone()));
        let dispatcher = ToolDispatcher::new(default_registry(tickets.clone()), audit.clone());

        let services = Arc::new(SessionServices {
            backend,
            guardrail: Guardrail::from_config(&config.guardrail),
            knowledge,
            dispatcher,
            audit,
            store,
            gaps: Arc::new(KnowledgeGapQueue::new()),
            instruction,
            settings: SessionSettings::from_config(config),
        });

        Self {
            session: Mutex::new(ConversationSession::new(services.clone())),
            services,
            tickets,
            generation: StdMutex::new(CancellationToken::new()),
        }
    }

    /// Resumes the persisted conversation and audit log, then opens the
    /// model session. Returns the number of restored messages.
    pub async fn start(&self) -> Result<usize, PlantwiseError> {
        let restored_audit = self.services.audit.restore().await;
        let history = load_history(self.services.store.as_ref()).await;
        let restored = history.len();

        let mut session = self.session.lock().await;
        session.initialize(history).await?;
        info!(messages = restored, audit_entries = restored_audit, "engine started");
        Ok(restored)
    }

    /// Submits one query. Opens the model session first if needed.
    pub async fn submit(
        &self,
        query: &str,
        image: Option<ImageAttachment>,
    ) -> Result<SubmitResult, PlantwiseError> {
        let cancel = self.current_generation();
        let mut session = self.session.lock().await;
        if cancel.is_cancelled() {
            return Err(PlantwiseError::Cancelled);
        }

        if matches!(
            session.state(),
            SessionState::Uninitialized | SessionState::Error
        ) {
            let prior = session.history().to_vec();
            if let Err(e) = session.initialize(prior).await {
                warn!(error = %e, "model session unavailable");
                self.services
                    .audit
                    .record(
                        Actor::System,
                        AuditAction::Response,
                        format!("API error: {e}"),
                        AuditStatus::Blocked,
                        None,
                    )
                    .await;
                return Ok(SubmitResult::refusal(
                    BACKEND_APOLOGY,
                    RefusalReason::BackendFailure,
                ));
            }
        }

        session.submit(query, image, &cancel).await
    }

    /// Rates a message.
    pub async fn feedback(&self, message_id: &str, positive: bool) -> Result<(), PlantwiseError> {
        self.session
            .lock()
            .await
            .submit_feedback(message_id, positive)
            .await
    }

    /// Cancels any in-flight submit and clears the conversation, its
    /// persisted copy and the audit log.
    pub async fn reset(&self) {
        self.next_generation();
        self.session.lock().await.reset().await;
    }

    /// Reset plus removal of the refused-query queue, which holds user text.
    pub async fn forget_me(&self) {
        self.reset().await;
        self.services.gaps.clear().await;
        info!("user data erased");
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Displayed history, oldest first.
    pub async fn history(&self) -> Vec<ConversationMessage> {
        self.session.lock().await.history().to_vec()
    }

    /// Tickets created in this process, newest first.
    pub async fn tickets(&self) -> Vec<Ticket> {
        self.tickets.list().await
    }

    /// Audit entries, newest first.
    pub async fn audit_log(&self) -> Vec<AuditEntry> {
        self.services.audit.read().await
    }

    pub async fn verify_audit(&self) -> Result<(), ChainBreak> {
        self.services.audit.verify().await
    }

    pub async fn knowledge_gaps(&self) -> Vec<KnowledgeGap> {
        self.services.gaps.list().await
    }

    /// Document management.
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.services.knowledge
    }

    fn current_generation(&self) -> CancellationToken {
        match self.generation.lock() {
            Ok(token) => token.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn next_generation(&self) {
        let mut token = match self.generation.lock() {
            Ok(token) => token,
            Err(poisoned) => poisoned.into_inner(),
        };
        token.cancel();
        *token = CancellationToken::new();
    }
}

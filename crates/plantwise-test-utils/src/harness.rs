// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end engine tests.
//!
//! `TestHarness` assembles a complete engine over [`MockModel`], an
//! in-memory session store and the seed corpus.

use std::sync::Arc;

use plantwise_agent::RagEngine;
use plantwise_config::PlantwiseConfig;
use plantwise_context::SystemInstruction;
use plantwise_core::{
    KnowledgeDocument, ModelReply, PlantwiseError, SessionStore, SubmitResult,
};
use plantwise_retrieval::{KnowledgeBase, seed_documents};
use plantwise_storage::MemorySessionStore;

use crate::mock_model::MockModel;

/// Builder for test environments.
pub struct TestHarnessBuilder {
    config: PlantwiseConfig,
    replies: Vec<ModelReply>,
    documents: Option<Vec<KnowledgeDocument>>,
    store: Option<Arc<dyn SessionStore>>,
    start: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: PlantwiseConfig::default(),
            replies: Vec::new(),
            documents: None,
            store: None,
            start: true,
        }
    }

    /// Queue model replies.
    pub fn with_replies(mut self, replies: Vec<ModelReply>) -> Self {
        self.replies = replies;
        self
    }

    /// Queue text-only model replies.
    pub fn with_texts(mut self, texts: &[&str]) -> Self {
        self.replies = texts.iter().map(|t| ModelReply::text(*t)).collect();
        self
    }

    /// Replace the seed corpus.
    pub fn with_documents(mut self, documents: Vec<KnowledgeDocument>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_config(mut self, config: PlantwiseConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an existing store, e.g. to resume a persisted session.
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Leave the engine unstarted.
    pub fn unstarted(mut self) -> Self {
        self.start = false;
        self
    }

    /// Build the harness and, unless `unstarted`, start the engine.
    pub async fn build(self) -> Result<TestHarness, PlantwiseError> {
        let model = Arc::new(MockModel::new());
        for reply in self.replies {
            model.push_reply(reply).await;
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemorySessionStore::new()));
        let knowledge = Arc::new(KnowledgeBase::in_memory(
            self.documents.unwrap_or_else(seed_documents),
            &self.config.retrieval,
        ));
        let instruction = SystemInstruction::default_for(&self.config.assistant.name);

        let engine = RagEngine::with_instruction(
            &self.config,
            model.clone(),
            store.clone(),
            knowledge,
            instruction,
        );
        if self.start {
            engine.start().await?;
        }

        Ok(TestHarness {
            engine,
            model,
            store,
        })
    }
}

/// A complete engine over mock adapters.
pub struct TestHarness {
    pub engine: RagEngine,
    pub model: Arc<MockModel>,
    pub store: Arc<dyn SessionStore>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default config, seed corpus and no queued replies.
    pub async fn new() -> Result<Self, PlantwiseError> {
        Self::builder().build().await
    }

    /// Submits a text query.
    pub async fn send(&self, text: &str) -> Result<SubmitResult, PlantwiseError> {
        self.engine.submit(text, None).await
    }
}

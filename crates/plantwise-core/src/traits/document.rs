// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store trait backing the knowledge base.

use async_trait::async_trait;

use crate::error::PlantwiseError;
use crate::types::KnowledgeDocument;

/// Ordered collection of knowledge documents.
///
/// Order is significant: it is the tie-break order of the ranker.
/// Title uniqueness is enforced one level up, by the knowledge base.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in store order.
    async fn list(&self) -> Result<Vec<KnowledgeDocument>, PlantwiseError>;

    /// Inserts a document at the head of the store.
    async fn add(&self, doc: KnowledgeDocument) -> Result<(), PlantwiseError>;

    /// Removes the document with `id`. Returns whether anything was removed.
    async fn remove(&self, id: &str) -> Result<bool, PlantwiseError>;

    /// Swaps the document that has the same id, keeping its position.
    async fn replace(&self, doc: KnowledgeDocument) -> Result<(), PlantwiseError>;
}

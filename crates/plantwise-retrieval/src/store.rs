// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory document store.

use async_trait::async_trait;
use plantwise_core::{DocumentStore, KnowledgeDocument, PlantwiseError};
use tokio::sync::RwLock;

/// Runtime document store. Contents live for the process lifetime.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<Vec<KnowledgeDocument>>,
}

impl MemoryDocumentStore {
    /// A store holding `docs` in the given order.
    pub fn new(docs: Vec<KnowledgeDocument>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self) -> Result<Vec<KnowledgeDocument>, PlantwiseError> {
        Ok(self.docs.read().await.clone())
    }

    async fn add(&self, doc: KnowledgeDocument) -> Result<(), PlantwiseError> {
        self.docs.write().await.insert(0, doc);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<bool, PlantwiseError> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(docs.len() != before)
    }

    async fn replace(&self, doc: KnowledgeDocument) -> Result<(), PlantwiseError> {
        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(slot) => {
                *slot = doc;
                Ok(())
            }
            None => Err(PlantwiseError::NotFound {
                kind: "document",
                id: doc.id,
            }),
        }
    }
}

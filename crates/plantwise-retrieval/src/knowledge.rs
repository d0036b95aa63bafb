// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge base: document lifecycle plus retrieval.

use std::sync::Arc;

use plantwise_config::RetrievalConfig;
use plantwise_core::{Category, DocumentStore, KnowledgeDocument, PlantwiseError};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::ranker::{Ranker, RankingWeights};
use crate::store::MemoryDocumentStore;

/// Filter for [`KnowledgeBase::search`]. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Case-insensitive substring of title or content.
    pub text: Option<String>,
    pub category: Option<Category>,
}

impl DocumentFilter {
    fn matches(&self, doc: &KnowledgeDocument) -> bool {
        if let Some(category) = self.category {
            if doc.category != category {
                return false;
            }
        }
        match self.text.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                doc.title.to_lowercase().contains(&needle)
                    || doc.content.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Knowledge base over a [`DocumentStore`].
///
/// Titles are unique, compared case-insensitively after trimming.
/// Writes hold `write` from the uniqueness check until the store call
/// returns.
pub struct KnowledgeBase {
    store: Arc<dyn DocumentStore>,
    write: Mutex<()>,
    ranker: Ranker,
    min_query_chars: usize,
}

impl KnowledgeBase {
    pub fn new(store: Arc<dyn DocumentStore>, weights: RankingWeights, min_query_chars: usize) -> Self {
        Self {
            store,
            write: Mutex::new(()),
            ranker: Ranker::new(weights),
            min_query_chars,
        }
    }

    /// In-memory knowledge base configured from the `[retrieval]` section.
    pub fn in_memory(docs: Vec<KnowledgeDocument>, config: &RetrievalConfig) -> Self {
        Self::new(
            Arc::new(MemoryDocumentStore::new(docs)),
            RankingWeights::from(config),
            config.min_query_chars,
        )
    }

    /// Adds a document at the head of the store.
    pub async fn ingest(&self, doc: KnowledgeDocument) -> Result<(), PlantwiseError> {
        validate(&doc)?;
        let _write = self.write.lock().await;
        let docs = self.store.list().await?;
        let key = title_key(&doc.title);
        if docs.iter().any(|d| title_key(&d.title) == key) {
            return Err(PlantwiseError::DuplicateTitle {
                title: doc.title.trim().to_string(),
            });
        }
        if docs.iter().any(|d| d.id == doc.id) {
            return Err(PlantwiseError::Validation(format!(
                "document id `{}` is already in use",
                doc.id
            )));
        }
        info!(id = %doc.id, category = %doc.category, "document ingested");
        self.store.add(doc).await
    }

    /// Swaps the document with the same id. The new title must not collide
    /// with any other document.
    pub async fn replace(&self, doc: KnowledgeDocument) -> Result<(), PlantwiseError> {
        validate(&doc)?;
        let _write = self.write.lock().await;
        let docs = self.store.list().await?;
        if !docs.iter().any(|d| d.id == doc.id) {
            return Err(PlantwiseError::NotFound {
                kind: "document",
                id: doc.id,
            });
        }
        let key = title_key(&doc.title);
        if docs
            .iter()
            .any(|d| d.id != doc.id && title_key(&d.title) == key)
        {
            return Err(PlantwiseError::DuplicateTitle {
                title: doc.title.trim().to_string(),
            });
        }
        info!(id = %doc.id, "document replaced");
        self.store.replace(doc).await
    }

    /// Removes a document. Returns whether it existed.
    pub async fn remove(&self, id: &str) -> Result<bool, PlantwiseError> {
        let _write = self.write.lock().await;
        let removed = self.store.remove(id).await?;
        if removed {
            info!(id, "document removed");
        }
        Ok(removed)
    }

    pub async fn list(&self) -> Result<Vec<KnowledgeDocument>, PlantwiseError> {
        self.store.list().await
    }

    /// Documents matching `filter`, in store order.
    pub async fn search(
        &self,
        filter: &DocumentFilter,
    ) -> Result<Vec<KnowledgeDocument>, PlantwiseError> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect())
    }

    /// Context documents for `query`, best first. Queries no longer than
    /// `min_query_chars` are not ranked.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<KnowledgeDocument>, PlantwiseError> {
        if query.chars().count() <= self.min_query_chars {
            debug!("query too short for retrieval");
            return Ok(Vec::new());
        }
        let docs = self.store.list().await?;
        let ranked = self.ranker.rank(query, &docs);
        debug!(
            selected = ranked.len(),
            top_score = ranked.first().map(|s| s.score).unwrap_or(0),
            "documents ranked"
        );
        Ok(ranked.into_iter().map(|s| s.document).collect())
    }
}

fn validate(doc: &KnowledgeDocument) -> Result<(), PlantwiseError> {
    if doc.id.trim().is_empty() {
        return Err(PlantwiseError::Validation("document id must not be empty".into()));
    }
    if doc.title.trim().is_empty() {
        return Err(PlantwiseError::Validation(
            "document title must not be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_documents;
    use chrono::NaiveDate;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::in_memory(seed_documents(), &RetrievalConfig::default())
    }

    fn doc(id: &str, title: &str) -> KnowledgeDocument {
        KnowledgeDocument::new(
            id,
            title,
            Category::Safety,
            "Wear gloves near the quench tank.",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn ingest_prepends_new_document() {
        let kb = kb();
        kb.ingest(doc("doc-100", "Quench Tank Safety")).await.unwrap();
        let docs = kb.list().await.unwrap();
        assert_eq!(docs.len(), 7);
        assert_eq!(docs[0].id, "doc-100");
    }

    #[tokio::test]
    async fn duplicate_title_is_rejected_case_insensitively() {
        let kb = kb();
        let err = kb
            .ingest(doc("doc-100", "  safety protocol 7b "))
            .await
            .unwrap_err();
        assert!(matches!(err, PlantwiseError::DuplicateTitle { ref title } if title == "safety protocol 7b"));
        assert_eq!(kb.list().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn replace_may_keep_own_title_but_not_take_another() {
        let kb = kb();
        let mut same = kb.list().await.unwrap()[0].clone();
        same.content = "Updated steps.".into();
        kb.replace(same).await.unwrap();

        let mut clash = kb.list().await.unwrap()[0].clone();
        clash.title = "Leave Policy 2024".into();
        assert!(matches!(
            kb.replace(clash).await,
            Err(PlantwiseError::DuplicateTitle { .. })
        ));
    }

    #[tokio::test]
    async fn replace_unknown_document_fails() {
        let kb = kb();
        let err = kb.replace(doc("missing", "Whatever")).await.unwrap_err();
        assert!(matches!(err, PlantwiseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn search_filters_by_text_and_category() {
        let kb = kb();
        let procedures = kb
            .search(&DocumentFilter {
                text: None,
                category: Some(Category::Procedures),
            })
            .await
            .unwrap();
        assert_eq!(procedures.len(), 2);

        let yubikey = kb
            .search(&DocumentFilter {
                text: Some("YUBIKEY".into()),
                category: None,
            })
            .await
            .unwrap();
        assert_eq!(yubikey.len(), 1);
        assert_eq!(yubikey[0].id, "doc-004");
    }

    #[tokio::test]
    async fn retrieve_ranks_seed_corpus() {
        let kb = kb();
        let docs = kb.retrieve("What is the max pressure of the press?").await.unwrap();
        assert_eq!(docs[0].id, "doc-002");
    }

    #[tokio::test]
    async fn short_query_skips_ranking() {
        let kb = kb();
        assert!(kb.retrieve("hi").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_title_is_invalid() {
        let kb = kb();
        assert!(matches!(
            kb.ingest(doc("x", "   ")).await,
            Err(PlantwiseError::Validation(_))
        ));
    }

    /// Yields inside `list` so concurrent writers interleave between the
    /// uniqueness check and the insert.
    struct YieldingStore(MemoryDocumentStore);

    #[async_trait::async_trait]
    impl DocumentStore for YieldingStore {
        async fn list(&self) -> Result<Vec<KnowledgeDocument>, PlantwiseError> {
            let docs = self.0.list().await;
            tokio::task::yield_now().await;
            docs
        }

        async fn add(&self, doc: KnowledgeDocument) -> Result<(), PlantwiseError> {
            self.0.add(doc).await
        }

        async fn remove(&self, id: &str) -> Result<bool, PlantwiseError> {
            self.0.remove(id).await
        }

        async fn replace(&self, doc: KnowledgeDocument) -> Result<(), PlantwiseError> {
            self.0.replace(doc).await
        }
    }

    #[tokio::test]
    async fn concurrent_ingests_keep_titles_unique() {
        let kb = KnowledgeBase::new(
            Arc::new(YieldingStore(MemoryDocumentStore::new(Vec::new()))),
            RankingWeights::default(),
            2,
        );

        let (a, b) = tokio::join!(
            kb.ingest(doc("doc-1", "Press Safety")),
            kb.ingest(doc("doc-2", "press safety")),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert!(matches!(
            a.err().or(b.err()),
            Some(PlantwiseError::DuplicateTitle { .. })
        ));
        assert_eq!(kb.list().await.unwrap().len(), 1);
    }
}

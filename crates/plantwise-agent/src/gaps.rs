// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queries refused for lack of internal documents, kept for expert review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// One refused query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGap {
    /// The query after PII scrubbing.
    pub query: String,
    pub timestamp: DateTime<Utc>,
}

/// Review queue, oldest first.
#[derive(Debug, Default)]
pub struct KnowledgeGapQueue {
    gaps: Mutex<Vec<KnowledgeGap>>,
}

impl KnowledgeGapQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, query: impl Into<String>) {
        self.gaps.lock().await.push(KnowledgeGap {
            query: query.into(),
            timestamp: Utc::now(),
        });
    }

    pub async fn list(&self) -> Vec<KnowledgeGap> {
        self.gaps.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.gaps.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queue_keeps_arrival_order() {
        let queue = KnowledgeGapQueue::new();
        queue.push("coffee recipe").await;
        queue.push("parking rules").await;
        let queries: Vec<_> = queue.list().await.into_iter().map(|g| g.query).collect();
        assert_eq!(queries, vec!["coffee recipe", "parking rules"]);

        queue.clear().await;
        assert!(queue.list().await.is_empty());
    }
}

// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge base and lexical relevance ranking.
//!
//! The [`Ranker`] scores documents by token overlap with title and category
//! boosts. The [`KnowledgeBase`] owns a [`DocumentStore`](plantwise_core::DocumentStore),
//! enforces title uniqueness, and runs retrieval for the conversation session.

pub mod knowledge;
pub mod ranker;
pub mod seed;
pub mod store;

pub use knowledge::{DocumentFilter, KnowledgeBase};
pub use ranker::{Ranker, RankingWeights, ScoredDocument, rank, tokenize};
pub use seed::seed_documents;
pub use store::MemoryDocumentStore;

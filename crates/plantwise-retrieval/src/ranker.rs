// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical relevance ranker.
//!
//! Scoring, per document:
//! - `category_boost` if the category name occurs in the raw query
//! - per query token found in `title + " " + content`: +1, plus `title_boost`
//!   when the token is also in the title
//!
//! Documents scoring above `min_score` are returned best first. Ties keep
//! store order.

use plantwise_config::RetrievalConfig;
use plantwise_core::KnowledgeDocument;

/// Characters removed from the query before splitting.
const PUNCTUATION: [char; 9] = ['.', ',', '?', '!', ';', ':', '"', '(', ')'];

/// Tokens this short or shorter are ignored.
const MIN_TOKEN_CHARS: usize = 2;

/// Interrogative and prepositional words that carry no retrieval signal.
const STOP_WORDS: [&str; 30] = [
    // Polish
    "czy", "jak", "co", "kiedy", "gdzie", "dlaczego", "ile", "w", "z", "na", "proszę", "o", "dla",
    // English
    "what", "how", "when", "where", "why", "who", "which", "the", "and", "for", "with", "about",
    "does", "please", "are", "can", "from",
];

/// Score contributions. Defaults: 5 / 5 / threshold 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingWeights {
    pub category_boost: u32,
    pub title_boost: u32,
    /// Documents must score strictly above this.
    pub min_score: u32,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            category_boost: 5,
            title_boost: 5,
            min_score: 1,
        }
    }
}

impl From<&RetrievalConfig> for RankingWeights {
    fn from(config: &RetrievalConfig) -> Self {
        Self {
            category_boost: config.category_boost,
            title_boost: config.title_boost,
            min_score: config.min_score,
        }
    }
}

/// A document with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: KnowledgeDocument,
    pub score: u32,
}

/// Lowercases, strips punctuation, splits on whitespace, and drops short
/// tokens and stop-words.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .replace(PUNCTUATION, "")
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Ranks `documents` against `query` with default weights.
pub fn rank(query: &str, documents: &[KnowledgeDocument]) -> Vec<KnowledgeDocument> {
    Ranker::default()
        .rank(query, documents)
        .into_iter()
        .map(|scored| scored.document)
        .collect()
}

/// Lexical ranker with configurable weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    weights: RankingWeights,
}

impl Ranker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> RankingWeights {
        self.weights
    }

    /// Scores one document against pre-tokenized query terms.
    pub fn score(&self, query_lower: &str, tokens: &[String], doc: &KnowledgeDocument) -> u32 {
        let mut score = 0;
        if query_lower.contains(&doc.category.to_string().to_lowercase()) {
            score += self.weights.category_boost;
        }

        let title = doc.title.to_lowercase();
        let haystack = format!("{title} {}", doc.content.to_lowercase());
        for token in tokens {
            if haystack.contains(token.as_str()) {
                score += 1;
                if title.contains(token.as_str()) {
                    score += self.weights.title_boost;
                }
            }
        }
        score
    }

    /// Documents relevant to `query`, best first. Empty when no token survives
    /// tokenization.
    pub fn rank(&self, query: &str, documents: &[KnowledgeDocument]) -> Vec<ScoredDocument> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let query_lower = query.to_lowercase();
        let mut scored: Vec<ScoredDocument> = documents
            .iter()
            .filter_map(|doc| {
                let score = self.score(&query_lower, &tokens, doc);
                (score > self.weights.min_score).then(|| ScoredDocument {
                    document: doc.clone(),
                    score,
                })
            })
            .collect();
        // sort_by is stable: equal scores keep store order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use plantwise_core::Category;

    fn doc(id: &str, title: &str, category: Category, content: &str) -> KnowledgeDocument {
        KnowledgeDocument::new(
            id,
            title,
            category,
            content,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    #[test]
    fn tokenize_strips_punctuation_and_stop_words() {
        assert_eq!(
            tokenize("How do I (quickly) reset the PRESS?"),
            vec!["quickly", "reset", "press"]
        );
        assert_eq!(tokenize("Jak działa prasa?"), vec!["działa", "prasa"]);
    }

    #[test]
    fn stop_word_only_query_has_no_tokens() {
        assert!(tokenize("czy jak co w z na").is_empty());
        assert!(tokenize("what about the").is_empty());
    }

    #[test]
    fn title_match_outranks_body_match() {
        let docs = vec![
            doc("a", "Forklift manual", Category::Procedures, "check brakes of the press"),
            doc("b", "Press maintenance", Category::Maintenance, "oil every 48h"),
        ];
        let ranked = rank("press", &docs);
        let ids: Vec<_> = ranked.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn single_body_only_match_is_below_threshold() {
        let docs = vec![doc("a", "Forklift", Category::Procedures, "press the brake pedal")];
        assert!(rank("press", &docs).is_empty());
    }

    #[test]
    fn two_body_matches_pass_threshold() {
        let docs = vec![doc("a", "Forklift", Category::Procedures, "press the brake pedal")];
        let scored = Ranker::default().rank("press brake", &docs);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].score, 2);
    }

    #[test]
    fn category_name_in_query_boosts() {
        let docs = vec![doc("a", "Leave policy", Category::Hr, "apply in the portal")];
        let scored = Ranker::default().rank("hr portal", &docs);
        assert_eq!(scored[0].score, 5 + 1);
    }

    #[test]
    fn ties_keep_store_order() {
        let docs = vec![
            doc("first", "Valve check", Category::Maintenance, ""),
            doc("second", "Valve check", Category::Maintenance, ""),
        ];
        let ids: Vec<_> = rank("valve", &docs).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn custom_weights_apply() {
        let ranker = Ranker::new(RankingWeights {
            category_boost: 0,
            title_boost: 10,
            min_score: 0,
        });
        let docs = vec![doc("a", "Valve", Category::Safety, "")];
        assert_eq!(ranker.rank("valve", &docs)[0].score, 11);
    }
}

// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed-system exceptions: queries answered without context documents.

use std::sync::LazyLock;

use regex::Regex;

// Greetings, help requests and questions about the assistant itself,
// in Polish and English. Matched at the start of the trimmed query.
static META_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:hej|cześć|dzień dobry|witaj|pomoc|menu|start|kim jesteś|co potrafisz|co robisz|funkcje|możliwości|w czym pomagasz|dlaczego tu jesteś|cel|hello|hi|hey|good morning|help|who are you|what can you do|what do you do|features|capabilities)\b",
    )
    .unwrap()
});

/// True for greetings and identity/capability questions.
pub fn is_meta_query(text: &str) -> bool {
    META_QUERY.is_match(text.trim())
}

/// Whether a query may reach the model.
///
/// Without retrieved documents the model is only consulted for meta
/// queries, image queries, or when the session already has prior turns.
pub fn may_answer(has_documents: bool, query: &str, has_image: bool, has_history: bool) -> bool {
    has_documents || has_image || has_history || is_meta_query(query)
}

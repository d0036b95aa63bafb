// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed assistant texts and post-processing of model replies.

use std::sync::LazyLock;

use plantwise_context::CLARIFICATION_SENTINEL;
use plantwise_core::Widget;
use regex::Regex;

/// Reply to a blocked prompt-injection attempt.
pub const POLICY_REFUSAL: &str =
    "⚠️ PROTOCOL VIOLATION: An attempt to manipulate the system was detected. The incident has been logged.";

/// Reply when no internal document covers the question.
pub const KNOWLEDGE_GAP_REFUSAL: &str = "⚠️ ACCESS DENIED: The knowledge base has no information \
on this topic. My protocols forbid using external knowledge or speculating.";

/// Reply when the model backend fails or times out.
pub const BACKEND_APOLOGY: &str =
    "⚠️ Sorry, a technical problem occurred. Please try again.";

/// Title of checklists synthesized from numbered replies.
pub const CHECKLIST_TITLE: &str = "STEP LIST (SOP)";

/// Greeting shown at the start of a fresh session.
pub fn welcome_text(name: &str) -> String {
    format!(
        "{name} ready. Ask about safety rules, maintenance procedures or plant operations. \
Answers come only from the internal knowledge base."
    )
}

static NUMBERED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// Removes the clarification sentinel. Returns the cleaned text and whether
/// the sentinel was present.
pub fn extract_clarification(text: &str) -> (String, bool) {
    if text.contains(CLARIFICATION_SENTINEL) {
        (text.replacen(CLARIFICATION_SENTINEL, "", 1).trim().to_string(), true)
    } else {
        (text.to_string(), false)
    }
}

/// Builds a checklist from lines that start with `N.`, if there are at least two.
pub fn synthesize_checklist(text: &str) -> Option<Widget> {
    let steps: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| NUMBERED_LINE.is_match(line))
        .map(|line| NUMBERED_LINE.replace(line, "").trim().to_string())
        .collect();

    (steps.len() >= 2).then(|| Widget::Checklist {
        title: CHECKLIST_TITLE.to_string(),
        steps,
    })
}

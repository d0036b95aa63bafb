// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PII redaction: email addresses, 11-digit national IDs, phone numbers.
//!
//! Applied cumulatively in that order. The `regex` crate has no lookaround,
//! so the "not inside a word / digit run" boundaries are checked by hand.

use std::sync::LazyLock;

use regex::Regex;

pub const EMAIL_PLACEHOLDER: &str = "[EMAIL_REDACTED]";
pub const ID_PLACEHOLDER: &str = "[ID_REDACTED]";
pub const PHONE_PLACEHOLDER: &str = "[PHONE_REDACTED]";

/// Length of a national identification number (PESEL).
const NATIONAL_ID_DIGITS: usize = 11;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

// Optional +48 / 0048 / (48) prefix, three groups of three digits, then end of
// input or a non-word char. The trailing char is consumed and given back by
// the caller. Matches never start on a separator.
static PHONE_AT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\(?(?:\+|00)?48\)?)?[ -]?[0-9]{3}[ -]?[0-9]{3}[ -]?[0-9]{3}(?:$|[^A-Za-z0-9_])",
    )
    .unwrap()
});

/// Result of [`scrub`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrubbed {
    pub text: String,
    /// True if at least one pattern matched.
    pub was_redacted: bool,
}

/// Replaces every email, national ID and phone number in `text` with a placeholder.
pub fn scrub(text: &str) -> Scrubbed {
    let mut was_redacted = false;

    let mut current = match EMAIL.replace_all(text, EMAIL_PLACEHOLDER) {
        std::borrow::Cow::Borrowed(_) => text.to_string(),
        std::borrow::Cow::Owned(replaced) => {
            was_redacted = true;
            replaced
        }
    };

    if let Some(replaced) = redact_national_ids(&current) {
        was_redacted = true;
        current = replaced;
    }

    if let Some(replaced) = redact_phones(&current) {
        was_redacted = true;
        current = replaced;
    }

    Scrubbed {
        text: current,
        was_redacted,
    }
}

fn redact_national_ids(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for run in DIGIT_RUN.find_iter(text) {
        if run.len() == NATIONAL_ID_DIGITS {
            out.push_str(&text[last..run.start()]);
            out.push_str(ID_PLACEHOLDER);
            last = run.end();
        }
    }
    if last == 0 {
        return None;
    }
    out.push_str(&text[last..]);
    Some(out)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn redact_phones(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut found = false;
    let mut pos = 0;

    while pos < text.len() {
        let preceded_by_word = text[..pos].chars().next_back().is_some_and(is_word_char);
        let on_separator = text[pos..].starts_with([' ', '-']);
        if !preceded_by_word && !on_separator {
            if let Some(m) = PHONE_AT.find(&text[pos..]) {
                let matched = m.as_str();
                let mut end = pos + m.end();
                if let Some(boundary) = matched.chars().next_back().filter(|c| !c.is_ascii_digit())
                {
                    end -= boundary.len_utf8();
                }
                out.push_str(&text[last..pos]);
                out.push_str(PHONE_PLACEHOLDER);
                last = end;
                pos = end;
                found = true;
                continue;
            }
        }
        pos += text[pos..].chars().next().map_or(1, char::len_utf8);
    }

    if !found {
        return None;
    }
    out.push_str(&text[last..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_redacted() {
        let s = scrub("mail anna.kowalska@plant.example.com today");
        assert_eq!(s.text, "mail [EMAIL_REDACTED] today");
        assert!(s.was_redacted);
    }

    #[test]
    fn every_email_occurrence_is_replaced() {
        let s = scrub("a@b.pl, c@d.com");
        assert_eq!(s.text, "[EMAIL_REDACTED], [EMAIL_REDACTED]");
    }

    #[test]
    fn eleven_digit_id_is_redacted() {
        let s = scrub("PESEL 44051401359 on file");
        assert_eq!(s.text, "PESEL [ID_REDACTED] on file");
    }

    #[test]
    fn longer_digit_runs_are_not_ids() {
        let s = scrub("serial 123456789012");
        assert_eq!(s.text, "serial 123456789012");
        assert!(!s.was_redacted);
    }

    #[test]
    fn plain_phone_is_redacted() {
        assert_eq!(scrub("call 600 700 800").text, "call [PHONE_REDACTED]");
        assert_eq!(scrub("call 600-700-800.").text, "call [PHONE_REDACTED].");
        assert_eq!(scrub("call 600700800").text, "call [PHONE_REDACTED]");
    }

    #[test]
    fn prefixed_phone_is_redacted() {
        assert_eq!(scrub("tel +48 600 700 800").text, "tel [PHONE_REDACTED]");
        assert_eq!(scrub("tel 0048600700800").text, "tel [PHONE_REDACTED]");
        assert_eq!(scrub("tel (48) 600-700-800").text, "tel [PHONE_REDACTED]");
    }

    #[test]
    fn phone_inside_word_is_kept() {
        assert_eq!(scrub("part A600700800").text, "part A600700800");
        assert_eq!(scrub("part 600700800B").text, "part 600700800B");
    }

    #[test]
    fn several_phones_are_all_replaced() {
        let s = scrub("600 700 800 or 601 701 801");
        assert_eq!(s.text, "[PHONE_REDACTED] or [PHONE_REDACTED]");
    }

    #[test]
    fn all_kinds_together() {
        let s = scrub("jan@x.pl 44051401359 600700800");
        assert_eq!(s.text, "[EMAIL_REDACTED] [ID_REDACTED] [PHONE_REDACTED]");
    }

    #[test]
    fn separator_before_phone_is_kept() {
        assert_eq!(scrub("id: 600 700 800").text, "id: [PHONE_REDACTED]");
    }

    #[test]
    fn clean_text_is_untouched() {
        let s = scrub("Pressure at 120 bar, check valve 3.");
        assert_eq!(s.text, "Pressure at 120 bar, check valve 3.");
        assert!(!s.was_redacted);
    }
}

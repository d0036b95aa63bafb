// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Plantwise configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlantwiseConfig {
    /// Assistant identity and system instruction.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Document ranking weights.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Guardrail deny-list extensions.
    #[serde(default)]
    pub guardrail: GuardrailConfig,

    /// Audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Conversation session settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Assistant identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Display name of the assistant.
    #[serde(default = "default_assistant_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system instruction. Overridden by `system_instruction_file` if both set.
    #[serde(default)]
    pub system_instruction: Option<String>,

    /// Path to a file containing the system instruction.
    #[serde(default)]
    pub system_instruction_file: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            log_level: default_log_level(),
            system_instruction: None,
            system_instruction_file: None,
        }
    }
}

fn default_assistant_name() -> String {
    "Plantwise".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` requires the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for chat sessions.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Sampling temperature. Kept low for strict adherence to the context.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient HTTP errors (429/500/503).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            temperature: default_temperature(),
            base_url: default_base_url(),
            timeout_secs: default_http_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_http_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    1
}

/// Relevance ranking weights.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Bonus when the document category name appears in the query.
    #[serde(default = "default_category_boost")]
    pub category_boost: u32,

    /// Extra bonus per query token found in the title.
    #[serde(default = "default_title_boost")]
    pub title_boost: u32,

    /// Documents must score strictly above this to be selected.
    #[serde(default = "default_min_score")]
    pub min_score: u32,

    /// Queries this short or shorter skip retrieval entirely.
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            category_boost: default_category_boost(),
            title_boost: default_title_boost(),
            min_score: default_min_score(),
            min_query_chars: default_min_query_chars(),
        }
    }
}

fn default_category_boost() -> u32 {
    5
}

fn default_title_boost() -> u32 {
    5
}

fn default_min_score() -> u32 {
    1
}

fn default_min_query_chars() -> usize {
    2
}

/// Guardrail configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GuardrailConfig {
    /// Phrases added to the built-in injection deny-list.
    #[serde(default)]
    pub extra_deny_phrases: Vec<String>,
}

/// Audit log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Maximum retained entries; oldest are evicted.
    #[serde(default = "default_audit_capacity")]
    pub capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            capacity: default_audit_capacity(),
        }
    }
}

fn default_audit_capacity() -> usize {
    50
}

/// Conversation session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// A repeated query inside this window does not duplicate the user message.
    #[serde(default = "default_retry_window_secs")]
    pub retry_window_secs: u64,

    /// Upper bound for one model call, tool round-trips included.
    #[serde(default = "default_model_timeout_secs")]
    pub model_timeout_secs: u64,

    /// JSON file backing the session store. `None` keeps state in memory.
    #[serde(default)]
    pub history_file: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retry_window_secs: default_retry_window_secs(),
            model_timeout_secs: default_model_timeout_secs(),
            history_file: None,
        }
    }
}

fn default_retry_window_secs() -> u64 {
    5
}

fn default_model_timeout_secs() -> u64 {
    60
}

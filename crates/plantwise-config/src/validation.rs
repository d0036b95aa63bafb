// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::PlantwiseConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration. Collects every failure instead of
/// stopping at the first.
pub fn validate_config(config: &PlantwiseConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.assistant.name.trim().is_empty() {
        errors.push(ConfigError::validation("assistant.name must not be empty"));
    }

    let level = config.assistant.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "assistant.log_level `{}` is not one of {}",
            config.assistant.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if !(0.0..=2.0).contains(&config.gemini.temperature) {
        errors.push(ConfigError::validation(format!(
            "gemini.temperature must be within 0.0..=2.0, got {}",
            config.gemini.temperature
        )));
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::validation("gemini.model must not be empty"));
    }

    let base_url = config.gemini.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "gemini.base_url `{base_url}` must start with http:// or https://"
        )));
    }

    if config.gemini.timeout_secs == 0 {
        errors.push(ConfigError::validation("gemini.timeout_secs must be at least 1"));
    }

    if config.audit.capacity == 0 {
        errors.push(ConfigError::validation("audit.capacity must be at least 1"));
    }

    if config.session.model_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "session.model_timeout_secs must be at least 1",
        ));
    }

    for (i, phrase) in config.guardrail.extra_deny_phrases.iter().enumerate() {
        if phrase.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "guardrail.extra_deny_phrases[{i}] must not be empty"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

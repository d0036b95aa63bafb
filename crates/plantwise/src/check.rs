// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plantwise check` command implementation.
//!
//! Validates the loaded configuration against the environment: API key,
//! instruction file, history file and the knowledge corpus.

use std::io::IsTerminal;
use std::path::Path;

use colored::Colorize;
use plantwise_config::PlantwiseConfig;
use plantwise_core::{HealthStatus, PlantwiseError, PluginAdapter};
use plantwise_gemini::GeminiBackend;
use plantwise_retrieval::seed_documents;
use plantwise_storage::JsonFileSessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
        }
    }
}

/// Runs all checks and prints a report. Fails if any check failed.
pub async fn run_check(config: &PlantwiseConfig) -> Result<(), PlantwiseError> {
    let use_color = std::io::stdout().is_terminal();
    let results = vec![
        CheckResult::new(
            "config",
            CheckStatus::Pass,
            format!(
                "assistant={} model={} audit.capacity={}",
                config.assistant.name, config.gemini.model, config.audit.capacity
            ),
        ),
        check_backend(config).await,
        check_instruction(config.assistant.system_instruction_file.as_deref()).await,
        check_history(config.session.history_file.as_deref()).await,
        check_corpus(),
    ];

    println!();
    println!("  plantwise check");
    println!("  {}", "-".repeat(50));

    let mut failed = 0;
    for result in &results {
        let symbol = match (&result.status, use_color) {
            (CheckStatus::Pass, true) => "ok".green().to_string(),
            (CheckStatus::Warn, true) => "!!".yellow().to_string(),
            (CheckStatus::Fail, true) => "xx".red().to_string(),
            (CheckStatus::Pass, false) => "ok".to_string(),
            (CheckStatus::Warn, false) => "!!".to_string(),
            (CheckStatus::Fail, false) => "xx".to_string(),
        };
        if result.status == CheckStatus::Fail {
            failed += 1;
        }
        println!("  [{symbol}] {:<12} {}", result.name, result.message);
    }
    println!();

    if failed > 0 {
        return Err(PlantwiseError::Config(format!("{failed} check(s) failed")));
    }
    Ok(())
}

async fn check_backend(config: &PlantwiseConfig) -> CheckResult {
    let backend = match GeminiBackend::new(config) {
        Ok(backend) => backend,
        Err(e) => return CheckResult::new("gemini", CheckStatus::Fail, e.to_string()),
    };
    match backend.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new(
            "gemini",
            CheckStatus::Pass,
            format!("API key present, model {}", config.gemini.model),
        ),
        Ok(HealthStatus::Degraded(msg)) => CheckResult::new("gemini", CheckStatus::Warn, msg),
        Ok(HealthStatus::Unhealthy(msg)) => CheckResult::new("gemini", CheckStatus::Fail, msg),
        Err(e) => CheckResult::new("gemini", CheckStatus::Fail, e.to_string()),
    }
}

async fn check_instruction(file: Option<&str>) -> CheckResult {
    let Some(file) = file else {
        return CheckResult::new("instruction", CheckStatus::Pass, "built-in");
    };
    match tokio::fs::read_to_string(file).await {
        Ok(text) if text.trim().is_empty() => CheckResult::new(
            "instruction",
            CheckStatus::Warn,
            format!("{file} is empty, built-in instruction will be used"),
        ),
        Ok(_) => CheckResult::new("instruction", CheckStatus::Pass, file.to_string()),
        Err(e) => CheckResult::new(
            "instruction",
            CheckStatus::Warn,
            format!("{file} unreadable ({e}), built-in instruction will be used"),
        ),
    }
}

async fn check_history(file: Option<&str>) -> CheckResult {
    let Some(file) = file else {
        return CheckResult::new("history", CheckStatus::Pass, "in memory, not persisted");
    };
    let store = match JsonFileSessionStore::open(Path::new(file)).await {
        Ok(store) => store,
        Err(e) => return CheckResult::new("history", CheckStatus::Fail, e.to_string()),
    };
    match store.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new("history", CheckStatus::Pass, file.to_string()),
        Ok(HealthStatus::Degraded(msg)) => CheckResult::new("history", CheckStatus::Warn, msg),
        Ok(HealthStatus::Unhealthy(msg)) => CheckResult::new("history", CheckStatus::Fail, msg),
        Err(e) => CheckResult::new("history", CheckStatus::Fail, e.to_string()),
    }
}

fn check_corpus() -> CheckResult {
    let docs = seed_documents();
    let with_media = docs.iter().filter(|d| d.has_media()).count();
    CheckResult::new(
        "corpus",
        CheckStatus::Pass,
        format!("{} documents, {with_media} with media", docs.len()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_instruction_file_warns() {
        let result = check_instruction(Some("/nonexistent/instruction.txt")).await;
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn readable_instruction_file_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instruction.txt");
        tokio::fs::write(&path, "Answer only from documents.").await.unwrap();

        let result = check_instruction(path.to_str()).await;
        assert_eq!(result.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn history_in_missing_directory_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later").join("session.json");

        let result = check_history(path.to_str()).await;
        assert_eq!(result.status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn no_history_file_is_in_memory() {
        let result = check_history(None).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.contains("in memory"));
    }

    #[tokio::test]
    async fn backend_with_key_passes() {
        let mut config = plantwise_config::load_and_validate_str("").unwrap();
        config.gemini.api_key = Some("test-key".into());
        assert_eq!(check_backend(&config).await.status, CheckStatus::Pass);
    }

    #[test]
    fn corpus_is_not_empty() {
        let result = check_corpus();
        assert!(!result.message.starts_with("0 "));
    }
}

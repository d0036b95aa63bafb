// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System instruction: loaded once per model session.

use plantwise_config::AssistantConfig;
use tracing::{info, warn};

/// Marker the model puts in a reply that asks a clarifying question.
pub const CLARIFICATION_SENTINEL: &str = "[CLARIFICATION]";

/// Marker added to context documents that carry images or video.
pub const MEDIA_FLAG: &str = "[MEDIA_ATTACHMENT_AVAILABLE]";

/// The system instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInstruction {
    text: String,
}

impl SystemInstruction {
    /// Loads the instruction: `system_instruction_file` > `system_instruction`
    /// > built-in default. An unreadable or empty file falls back.
    pub async fn load(config: &AssistantConfig) -> Self {
        if let Some(path) = &config.system_instruction_file {
            match tokio::fs::read_to_string(path).await {
                Ok(content) if !content.trim().is_empty() => {
                    info!(path = path.as_str(), "loaded system instruction from file");
                    return Self {
                        text: content.trim().to_string(),
                    };
                }
                Ok(_) => warn!(path = path.as_str(), "system instruction file is empty"),
                Err(e) => warn!(
                    path = path.as_str(),
                    error = %e,
                    "failed to read system instruction file, falling back"
                ),
            }
        }

        match config.system_instruction.as_deref().map(str::trim) {
            Some(inline) if !inline.is_empty() => Self {
                text: inline.to_string(),
            },
            _ => Self::default_for(&config.name),
        }
    }

    /// Built-in closed-system instruction for an assistant called `name`.
    pub fn default_for(name: &str) -> Self {
        Self {
            text: format!(
                "You are {name}, an operational assistant in an industrial plant. You support \
operators, technicians and managers in their daily work.

ANSWER RULES:
1. The CONTEXT section (internal knowledge base) is your only source of truth.
2. For procedures (failures, safety), answer as a numbered list of steps (checklist).
3. For numeric data (pressure, temperature, status), present the values as key indicators (telemetry).
4. If the knowledge base does not contain the answer, say so plainly and suggest contacting the shift supervisor. Never invent safety procedures.
5. Style: technical, concise, professional. No pleasantries.
6. Safety comes first. Always warn about hazards.
7. MEDIA: if a CONTEXT document is marked {MEDIA_FLAG}, refer to its diagram or video.
8. If the question is ambiguous, ask one clarifying question and begin the reply with {CLARIFICATION_SENTINEL}.
9. When the user reports a fault or missing knowledge, call create_ticket. When the user asks to test their knowledge, call generate_quiz.

FORMATTING:
- Bold the key values.
- Use lists for instructions."
            ),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_instruction_names_assistant_and_markers() {
        let instruction = SystemInstruction::load(&AssistantConfig::default()).await;
        assert!(instruction.text().starts_with("You are Plantwise"));
        assert!(instruction.text().contains(CLARIFICATION_SENTINEL));
        assert!(instruction.text().contains(MEDIA_FLAG));
    }

    #[tokio::test]
    async fn inline_instruction_wins_over_default() {
        let config = AssistantConfig {
            system_instruction: Some("  Answer in haiku.  ".into()),
            ..Default::default()
        };
        let instruction = SystemInstruction::load(&config).await;
        assert_eq!(instruction.text(), "Answer in haiku.");
    }

    #[tokio::test]
    async fn file_instruction_wins_over_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instruction.md");
        std::fs::write(&path, "From file.\n").unwrap();
        let config = AssistantConfig {
            system_instruction: Some("Inline.".into()),
            system_instruction_file: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        assert_eq!(SystemInstruction::load(&config).await.text(), "From file.");
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_inline() {
        let config = AssistantConfig {
            system_instruction: Some("Inline.".into()),
            system_instruction_file: Some("/nonexistent/plantwise/instruction.md".into()),
            ..Default::default()
        };
        assert_eq!(SystemInstruction::load(&config).await.text(), "Inline.");
    }
}

// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `generate_quiz`: a template quiz about the current topic.

use async_trait::async_trait;
use plantwise_core::{PlantwiseError, QuizOption, Widget};

use super::string_arg;
use crate::tool::{Tool, ToolContext, ToolOutcome};

const DEFAULT_TOPIC: &str = "General knowledge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Difficulty {
    Easy,
    Hard,
}

impl Difficulty {
    fn parse(raw: Option<&str>) -> Result<Self, PlantwiseError> {
        match raw.map(str::to_ascii_uppercase).as_deref() {
            None | Some("EASY") => Ok(Difficulty::Easy),
            Some("HARD") => Ok(Difficulty::Hard),
            Some(other) => Err(PlantwiseError::tool(format!(
                "unknown quiz difficulty `{other}`"
            ))),
        }
    }
}

/// Builds a quiz widget from the topic and the top-ranked document.
///
/// The quiz is a fixed template: one question, three options (four on
/// HARD), option `a` correct.
pub struct GenerateQuizTool;

fn option(id: &str, text: &str, is_correct: bool) -> QuizOption {
    QuizOption {
        id: id.to_string(),
        text: text.to_string(),
        is_correct,
    }
}

#[async_trait]
impl Tool for GenerateQuizTool {
    fn name(&self) -> &str {
        "generate_quiz"
    }

    fn description(&self) -> &str {
        "Generate a short quiz that checks the user's knowledge of the latest topic."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "topic": { "type": "string" },
                "difficulty": { "type": "string", "enum": ["EASY", "HARD"] }
            },
            "required": ["topic"]
        })
    }

    async fn invoke(
        &self,
        args: serde_json::Value,
        ctx: ToolContext<'_>,
    ) -> Result<ToolOutcome, PlantwiseError> {
        let topic = string_arg(&args, "topic").unwrap_or(DEFAULT_TOPIC);
        let difficulty = Difficulty::parse(string_arg(&args, "difficulty"))?;
        let source = ctx
            .documents
            .first()
            .map(|doc| doc.id.as_str())
            .unwrap_or("knowledge base");

        let mut options = vec![
            option("a", "Following the documented procedure", true),
            option("b", "Speed of execution", false),
            option("c", "Improvisation", false),
        ];
        if difficulty == Difficulty::Hard {
            options.push(option("d", "Skipping steps under time pressure", false));
        }

        let widget = Widget::Quiz {
            title: format!("KNOWLEDGE QUIZ: {}", topic.to_uppercase()),
            question: format!("Check question on: {topic}. What matters most?"),
            options,
            explanation: format!("Based on document: {source}"),
        };

        Ok(ToolOutcome {
            result: serde_json::Value::String("Quiz generated successfully.".into()),
            ticket: None,
            widget: Some(widget),
        })
    }
}

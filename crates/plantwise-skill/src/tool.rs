// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait and registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use plantwise_core::{KnowledgeDocument, PlantwiseError, Ticket, ToolDeclaration, Widget};

/// What a tool sees of the current turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolContext<'a> {
    /// Documents ranked for the query, best first.
    pub documents: &'a [KnowledgeDocument],
}

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    /// Acknowledgement fed back to the model.
    pub result: serde_json::Value,
    /// Ticket to surface to the caller.
    pub ticket: Option<Ticket>,
    /// Widget to attach to the response.
    pub widget: Option<Widget>,
}

impl ToolOutcome {
    /// An outcome that only acknowledges with a message.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            result: serde_json::Value::String(text.into()),
            ticket: None,
            widget: None,
        }
    }
}

/// A function the model can call.
///
/// `invoke` receives the model's JSON arguments. Malformed arguments are
/// reported as [`PlantwiseError::Tool`].
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the arguments.
    fn parameters_schema(&self) -> serde_json::Value;

    async fn invoke(
        &self,
        args: serde_json::Value,
        ctx: ToolContext<'_>,
    ) -> Result<ToolOutcome, PlantwiseError>;
}

/// Registry of tools indexed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under its `name()`, replacing any previous one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Function declarations for the model session, sorted by name.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        let mut declarations: Vec<ToolDeclaration> = self
            .tools
            .values()
            .map(|tool| ToolDeclaration {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect();
        declarations.sort_by(|a, b| a.name.cmp(&b.name));
        declarations
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

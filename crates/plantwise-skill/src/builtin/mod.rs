// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in tools declared to every model session.

pub mod quiz;
pub mod ticket;

use std::sync::Arc;

pub use quiz::GenerateQuizTool;
pub use ticket::CreateTicketTool;

use crate::tickets::TicketBoard;
use crate::tool::ToolRegistry;

/// Registry holding `create_ticket` (writing to `board`) and `generate_quiz`.
pub fn default_registry(board: Arc<TicketBoard>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(CreateTicketTool::new(board)));
    registry.register(Arc::new(GenerateQuizTool));
    registry
}

/// Optional non-empty string argument, trimmed.
pub(crate) fn string_arg<'a>(args: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

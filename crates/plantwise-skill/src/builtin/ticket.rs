// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `create_ticket`: opens a service / expert-review ticket.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use plantwise_core::{PlantwiseError, Priority, Ticket, TicketStatus};
use tracing::info;

use super::string_arg;
use crate::tickets::TicketBoard;
use crate::tool::{Tool, ToolContext, ToolOutcome};

/// Location recorded when the model gives none.
const DEFAULT_LOCATION: &str = "System";

/// Creates a ticket and prepends it to the shared board.
pub struct CreateTicketTool {
    board: Arc<TicketBoard>,
}

impl CreateTicketTool {
    pub fn new(board: Arc<TicketBoard>) -> Self {
        Self { board }
    }
}

/// `REQ-` followed by the last six digits of the epoch milliseconds.
pub fn ticket_id(epoch_millis: i64) -> String {
    format!("REQ-{:06}", epoch_millis.rem_euclid(1_000_000))
}

#[async_trait]
impl Tool for CreateTicketTool {
    fn name(&self) -> &str {
        "create_ticket"
    }

    fn description(&self) -> &str {
        "Create a ticket for an expert or the service team when the user reports a problem \
         or a gap in the knowledge base."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": { "type": "string" },
                "description": { "type": "string" },
                "priority": { "type": "string", "enum": ["LOW", "MEDIUM", "HIGH", "CRITICAL"] }
            },
            "required": ["location", "description", "priority"]
        })
    }

    async fn invoke(
        &self,
        args: serde_json::Value,
        _ctx: ToolContext<'_>,
    ) -> Result<ToolOutcome, PlantwiseError> {
        let description = string_arg(&args, "description")
            .ok_or_else(|| PlantwiseError::tool("create_ticket requires a description"))?;
        let raw_priority = string_arg(&args, "priority")
            .ok_or_else(|| PlantwiseError::tool("create_ticket requires a priority"))?;
        let priority = Priority::from_str(&raw_priority.to_ascii_uppercase()).map_err(|_| {
            PlantwiseError::tool(format!("unknown ticket priority `{raw_priority}`"))
        })?;
        let location = string_arg(&args, "location").unwrap_or(DEFAULT_LOCATION);

        let now = Utc::now();
        let ticket = Ticket {
            id: ticket_id(now.timestamp_millis()),
            location: location.to_string(),
            description: description.to_string(),
            priority,
            status: TicketStatus::Open,
            timestamp: now,
        };

        self.board.push(ticket.clone()).await;
        info!(id = %ticket.id, priority = %ticket.priority, location = %ticket.location, "ticket created");

        Ok(ToolOutcome {
            result: serde_json::Value::String(format!("Ticket created ID: {}", ticket.id)),
            ticket: Some(ticket),
            widget: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool() -> (CreateTicketTool, Arc<TicketBoard>) {
        let board = Arc::new(TicketBoard::new());
        (CreateTicketTool::new(board.clone()), board)
    }

    #[test]
    fn id_uses_last_six_digits() {
        assert_eq!(ticket_id(1_718_000_123_456), "REQ-123456");
        assert_eq!(ticket_id(1_700_000_000_042), "REQ-000042");
    }

    #[tokio::test]
    async fn fields_are_taken_verbatim() {
        let (tool, board) = tool();
        let out = tool
            .invoke(
                json!({"location": "Line 3", "description": "Oil leak", "priority": "HIGH"}),
                ToolContext::default(),
            )
            .await
            .unwrap();
        let ticket = out.ticket.unwrap();
        assert_eq!(ticket.location, "Line 3");
        assert_eq!(ticket.description, "Oil leak");
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.id.starts_with("REQ-"));
        assert_eq!(out.result, json!(format!("Ticket created ID: {}", ticket.id)));
        assert_eq!(board.list().await[0], ticket);
    }

    #[tokio::test]
    async fn newest_ticket_is_first() {
        let (tool, board) = tool();
        for description in ["first", "second"] {
            tool.invoke(
                json!({"description": description, "priority": "LOW"}),
                ToolContext::default(),
            )
            .await
            .unwrap();
        }
        let tickets = board.list().await;
        assert_eq!(tickets[0].description, "second");
        assert_eq!(tickets[1].description, "first");
        assert_eq!(tickets[0].location, "System");
    }

    #[tokio::test]
    async fn lowercase_priority_is_accepted() {
        let (tool, _) = tool();
        let out = tool
            .invoke(
                json!({"description": "x", "priority": "critical"}),
                ToolContext::default(),
            )
            .await
            .unwrap();
        assert_eq!(out.ticket.unwrap().priority, Priority::Critical);
    }

    #[tokio::test]
    async fn malformed_arguments_fail_without_side_effect() {
        let (tool, board) = tool();
        for args in [
            json!({"priority": "HIGH"}),
            json!({"description": "  ", "priority": "HIGH"}),
            json!({"description": "x"}),
            json!({"description": "x", "priority": "URGENT"}),
        ] {
            let err = tool.invoke(args, ToolContext::default()).await.unwrap_err();
            assert!(matches!(err, PlantwiseError::Tool { .. }));
        }
        assert!(board.is_empty().await);
    }
}

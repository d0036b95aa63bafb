// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs the function calls of one model reply.
//!
//! For each call, in order: audit, local side effect, then the tool result is
//! sent back to the model. The model's last non-empty follow-up text is kept
//! for replies that carried no text of their own.

use std::sync::Arc;

use plantwise_audit::{Actor, AuditAction, AuditLog, AuditStatus};
use plantwise_core::{
    FunctionCall, ModelBackend, PlantwiseError, SessionHandle, Ticket, ToolDeclaration, Widget,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::tool::{ToolContext, ToolRegistry};

/// Side effects collected from one reply's tool calls. Later calls win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolEffects {
    pub ticket: Option<Ticket>,
    pub widget: Option<Widget>,
    /// Text the model answered a tool result with.
    pub follow_up: Option<String>,
}

/// Dispatches function calls against a registry.
pub struct ToolDispatcher {
    registry: ToolRegistry,
    audit: Arc<AuditLog>,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry, audit: Arc<AuditLog>) -> Self {
        Self { registry, audit }
    }

    /// Declarations for opening a model session.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.registry.declarations()
    }

    /// Executes `calls` in order and acknowledges each to the model.
    ///
    /// Unknown tools are audited and skipped. A tool that rejects its
    /// arguments fails alone: the failure is audited as a warning and an
    /// error result is sent to the model. Only a failure to reach the
    /// model is returned as `Err`; side effects already applied remain.
    pub async fn dispatch(
        &self,
        backend: &dyn ModelBackend,
        handle: &SessionHandle,
        calls: &[FunctionCall],
        ctx: ToolContext<'_>,
    ) -> Result<ToolEffects, PlantwiseError> {
        let mut effects = ToolEffects::default();

        for call in calls {
            let Some(tool) = self.registry.get(&call.name) else {
                warn!(tool = %call.name, "model called an undeclared tool");
                self.audit
                    .record(
                        Actor::System,
                        AuditAction::ToolExecution,
                        format!("Unknown tool call ignored: {}", call.name),
                        AuditStatus::Warning,
                        None,
                    )
                    .await;
                continue;
            };

            let response = match tool.invoke(call.args.clone(), ctx).await {
                Ok(outcome) => {
                    self.audit
                        .record(
                            Actor::System,
                            AuditAction::ToolExecution,
                            format!("Tool call: {}", call.name),
                            AuditStatus::Success,
                            None,
                        )
                        .await;
                    if outcome.ticket.is_some() {
                        effects.ticket = outcome.ticket;
                    }
                    if outcome.widget.is_some() {
                        effects.widget = outcome.widget;
                    }
                    json!({ "result": outcome.result })
                }
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "tool call failed");
                    self.audit
                        .record(
                            Actor::System,
                            AuditAction::ToolExecution,
                            format!("Tool call failed: {}: {e}", call.name),
                            AuditStatus::Warning,
                            None,
                        )
                        .await;
                    json!({ "error": e.to_string() })
                }
            };

            let reply = backend
                .send_tool_result(handle, &call.name, response)
                .await?;
            debug!(tool = %call.name, "tool result acknowledged");
            if !reply.text.trim().is_empty() {
                effects.follow_up = Some(reply.text);
            }
        }

        Ok(effects)
    }
}

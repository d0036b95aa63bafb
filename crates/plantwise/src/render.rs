// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of engine output.

use colored::Colorize;
use plantwise_audit::{AuditEntry, AuditStatus};
use plantwise_core::{ConversationMessage, KnowledgeDocument, Role, SubmitResult, Ticket, Widget};

/// Renders one submit result: answer text followed by its attachments.
pub fn submit_result(result: &SubmitResult) -> String {
    let mut out = Vec::new();

    match result.refusal {
        Some(reason) => {
            out.push(result.text.yellow().to_string());
            out.push(format!("[refused: {reason}]").dimmed().to_string());
        }
        None if result.is_clarification => {
            out.push(format!("{} {}", "?".cyan().bold(), result.text));
        }
        None => out.push(result.text.clone()),
    }

    if let Some(widget) = &result.widget {
        out.push(widget_block(widget));
    }
    if let Some(ticket) = &result.created_ticket {
        out.push(format!("{} {}", "ticket created:".green(), ticket_line(ticket)));
    }
    if let Some(media) = &result.media {
        for url in &media.urls {
            out.push(format!("{} {url}", format!("[{}]", media.kind).magenta()));
        }
    }
    if !result.sources.is_empty() {
        out.push(format!("sources: {}", result.sources.join(", ")).dimmed().to_string());
    }
    if result.persistence_degraded {
        out.push("warning: conversation could not be saved".yellow().to_string());
    }
    if let Some(id) = &result.message_id {
        out.push(format!("(message {id})").dimmed().to_string());
    }

    out.join("\n")
}

pub fn widget_block(widget: &Widget) -> String {
    let mut lines = vec![widget.title().bold().to_string()];
    match widget {
        Widget::Checklist { steps, .. } => {
            for (i, step) in steps.iter().enumerate() {
                lines.push(format!("  [ ] {}. {step}", i + 1));
            }
        }
        Widget::Telemetry { readings, .. } => {
            for r in readings {
                lines.push(format!("  {}: {} {} ({})", r.label, r.value, r.unit, r.status));
            }
        }
        Widget::Quiz {
            question,
            options,
            explanation,
            ..
        } => {
            lines.push(format!("  {question}"));
            for option in options {
                lines.push(format!("    {}) {}", option.id, option.text));
            }
            if let Some(correct) = options.iter().find(|o| o.is_correct) {
                lines.push(
                    format!("  answer: {} - {explanation}", correct.id)
                        .dimmed()
                        .to_string(),
                );
            }
        }
    }
    lines.join("\n")
}

pub fn ticket_line(ticket: &Ticket) -> String {
    format!(
        "{} [{}] {} @ {}: {}",
        ticket.id,
        ticket.priority,
        ticket.status,
        ticket.location,
        ticket.description
    )
}

pub fn audit_line(entry: &AuditEntry) -> String {
    let status = match entry.status {
        AuditStatus::Success => entry.status.to_string().green(),
        AuditStatus::Warning => entry.status.to_string().yellow(),
        AuditStatus::Blocked => entry.status.to_string().red(),
    };
    format!(
        "{} {:<6} {:<14} {status} [{}] {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.actor,
        entry.action,
        entry.compliance_standard,
        entry.details
    )
}

pub fn document_line(doc: &KnowledgeDocument) -> String {
    let media = if doc.has_media() { " +media" } else { "" };
    format!(
        "{} [{}] {} (updated {}){media}",
        doc.id.dimmed(),
        doc.category,
        doc.title,
        doc.last_updated
    )
}

pub fn history_line(message: &ConversationMessage) -> String {
    let who = match message.role {
        Role::User => "you".blue(),
        Role::Model => "assistant".green(),
        Role::System => "system".dimmed(),
    };
    format!("{who}: {}", message.text)
}

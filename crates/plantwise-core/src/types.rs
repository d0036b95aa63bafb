// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Plantwise workspace.
//!
//! Covers the knowledge corpus, conversation messages, tickets, widgets,
//! and the wire-neutral types exchanged with a model backend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Fixed id of the synthetic greeting message. It is displayed but never sent to the model.
pub const WELCOME_MESSAGE_ID: &str = "welcome";

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Model,
    SessionStore,
}

// --- Knowledge corpus ---

/// Knowledge document category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Safety,
    Maintenance,
    Procedures,
    Hr,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 4] = [
        Category::Safety,
        Category::Maintenance,
        Category::Procedures,
        Category::Hr,
    ];
}

/// Kind of media attached to a document or a response.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// A single media reference (diagram, photo, video link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub kind: MediaKind,
}

/// A document in the internal knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub content: String,
    pub last_updated: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attached_images: Vec<String>,
}

impl KnowledgeDocument {
    /// Creates a text-only document.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        content: impl Into<String>,
        last_updated: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            content: content.into(),
            last_updated,
            media: None,
            attached_images: Vec::new(),
        }
    }

    /// True when the document carries a media link or attached images.
    pub fn has_media(&self) -> bool {
        self.media.is_some() || !self.attached_images.is_empty()
    }

    /// Media payload for a response: attached images first, then the media link.
    pub fn media_payload(&self) -> Option<MediaPayload> {
        let mut urls = self.attached_images.clone();
        if let Some(media) = &self.media {
            urls.push(media.url.clone());
        }
        if urls.is_empty() {
            return None;
        }
        Some(MediaPayload {
            urls,
            kind: self.media.as_ref().map(|m| m.kind).unwrap_or_default(),
        })
    }
}

// --- Tickets ---

/// Ticket priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Ticket lifecycle status. Only `Open` is produced by this crate family.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

/// A service / expert-review ticket created by the `create_ticket` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub location: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub timestamp: DateTime<Utc>,
}

// --- Widgets ---

/// Health of a single telemetry reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TelemetryStatus {
    Normal,
    Warning,
    Critical,
}

/// One labelled key indicator in a telemetry widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub status: TelemetryStatus,
}

/// One answer option of a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

/// Structured side payload attached to one model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Widget {
    Checklist {
        title: String,
        steps: Vec<String>,
    },
    Telemetry {
        title: String,
        readings: Vec<TelemetryReading>,
    },
    Quiz {
        title: String,
        question: String,
        options: Vec<QuizOption>,
        explanation: String,
    },
}

impl Widget {
    /// Display title of the widget.
    pub fn title(&self) -> &str {
        match self {
            Widget::Checklist { title, .. }
            | Widget::Telemetry { title, .. }
            | Widget::Quiz { title, .. } => title,
        }
    }
}

/// Media surfaced alongside an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPayload {
    pub urls: Vec<String>,
    pub kind: MediaKind,
}

// --- Conversation ---

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
}

/// User rating of a model message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
}

/// Marks an assistant message that is a refusal rather than an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RefusalReason {
    /// Prompt injection detected by the guardrail.
    PolicyViolation,
    /// No internal document covers the question (closed-system refusal).
    KnowledgeGap,
    /// The model backend failed or timed out.
    BackendFailure,
}

/// A message in the displayed conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Base64 image sent with a user message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<Widget>,
    #[serde(default)]
    pub is_clarification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<RefusalReason>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl ConversationMessage {
    fn bare(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
            attached_image: None,
            ticket: None,
            media: None,
            widget: None,
            is_clarification: false,
            refusal: None,
            sources: Vec::new(),
            feedback: None,
        }
    }

    /// A user message, optionally carrying a base64 image.
    pub fn user(text: impl Into<String>, attached_image: Option<String>) -> Self {
        Self {
            attached_image,
            ..Self::bare(Role::User, text)
        }
    }

    /// A plain model message.
    pub fn model(text: impl Into<String>) -> Self {
        Self::bare(Role::Model, text)
    }

    /// A system notice. Never sent to the model.
    pub fn system(text: impl Into<String>) -> Self {
        Self::bare(Role::System, text)
    }

    /// The synthetic greeting shown at the start of a fresh session.
    pub fn welcome(text: impl Into<String>) -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_string(),
            ..Self::bare(Role::Model, text)
        }
    }

    /// True for the synthetic greeting.
    pub fn is_welcome(&self) -> bool {
        self.id == WELCOME_MESSAGE_ID
    }
}

/// Caller-visible outcome of one submitted query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub text: String,
    /// Titles of the documents used as context, de-duplicated in rank order.
    pub sources: Vec<String>,
    pub created_ticket: Option<Ticket>,
    pub media: Option<MediaPayload>,
    pub widget: Option<Widget>,
    pub is_clarification: bool,
    pub refusal: Option<RefusalReason>,
    /// Set when history or audit persistence failed during this turn.
    pub persistence_degraded: bool,
    /// Id of the model message appended to history, if any.
    pub message_id: Option<String>,
}

impl SubmitResult {
    /// A refusal carrying only text and its reason.
    pub fn refusal(text: impl Into<String>, reason: RefusalReason) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
            created_ticket: None,
            media: None,
            widget: None,
            is_clarification: false,
            refusal: Some(reason),
            persistence_degraded: false,
            message_id: None,
        }
    }
}

// --- Model backend types ---

/// Speaker of a model-native turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    User,
    Model,
}

/// One part of a prompt or turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptPart {
    Text(String),
    /// Base64-encoded inline image.
    InlineImage { mime_type: String, data: String },
}

/// A turn in the model-native history format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTurn {
    pub role: ModelRole,
    pub parts: Vec<PromptPart>,
}

impl ModelTurn {
    /// A single-text turn.
    pub fn text(role: ModelRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![PromptPart::Text(text.into())],
        }
    }
}

/// A function the model may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments.
    pub parameters: serde_json::Value,
}

/// Everything needed to open a model chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSessionConfig {
    pub system_instruction: String,
    pub temperature: f32,
    pub tools: Vec<ToolDeclaration>,
    pub history: Vec<ModelTurn>,
}

/// Opaque handle to a chat session held by a model backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle(pub String);

/// A function call issued by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

/// The model's reply to one `send`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelReply {
    pub text: String,
    #[serde(default)]
    pub function_calls: Vec<FunctionCall>,
}

impl ModelReply {
    /// A text-only reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            function_calls: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn category_display_is_upper_snake() {
        assert_eq!(Category::Safety.to_string(), "SAFETY");
        assert_eq!(Category::Hr.to_string(), "HR");
        assert_eq!(Category::from_str("maintenance").unwrap(), Category::Maintenance);
    }

    #[test]
    fn media_payload_lists_attached_images_before_link() {
        let mut doc = KnowledgeDocument::new("d1", "Press", Category::Maintenance, "x", date());
        assert!(doc.media_payload().is_none());
        doc.attached_images = vec!["img-1".into(), "img-2".into()];
        doc.media = Some(MediaRef {
            url: "https://cdn/video.mp4".into(),
            kind: MediaKind::Video,
        });
        let payload = doc.media_payload().unwrap();
        assert_eq!(payload.urls, vec!["img-1", "img-2", "https://cdn/video.mp4"]);
        assert_eq!(payload.kind, MediaKind::Video);
    }

    #[test]
    fn images_without_link_default_to_image_kind() {
        let mut doc = KnowledgeDocument::new("d1", "Press", Category::Maintenance, "x", date());
        doc.attached_images = vec!["img-1".into()];
        assert!(doc.has_media());
        assert_eq!(doc.media_payload().unwrap().kind, MediaKind::Image);
    }

    #[test]
    fn widget_serializes_with_type_tag() {
        let widget = Widget::Checklist {
            title: "Steps".into(),
            steps: vec!["a".into(), "b".into()],
        };
        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(json["type"], "checklist");
        assert_eq!(json["steps"][1], "b");
        assert_eq!(widget.title(), "Steps");
    }

    #[test]
    fn welcome_message_is_recognised() {
        let msg = ConversationMessage::welcome("hello");
        assert!(msg.is_welcome());
        assert_eq!(msg.role, Role::Model);
        assert!(!ConversationMessage::model("x").is_welcome());
    }

    #[test]
    fn message_round_trips_without_optional_fields() {
        let msg = ConversationMessage::user("hi", None);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("attached_image"));
        let back: ConversationMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn ticket_enums_use_upper_case_wire_names() {
        assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), "\"CRITICAL\"");
        assert_eq!(Priority::from_str("HIGH").unwrap(), Priority::High);
        assert_eq!(TicketStatus::InProgress.to_string(), "IN_PROGRESS");
    }
}

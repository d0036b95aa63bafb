// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who caused the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Actor {
    User,
    System,
    Guardrail,
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Query,
    Response,
    ToolExecution,
    SecurityBlock,
    DataRetrieval,
    UserFeedback,
    KnowledgeGap,
}

/// Outcome of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Blocked,
    Warning,
}

/// Regulatory framework an entry is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum ComplianceStandard {
    /// Risk management framework.
    #[strum(serialize = "NIST AI RMF")]
    NistAiRmf,
    /// Privacy.
    #[strum(serialize = "GDPR")]
    Gdpr,
    /// AI management system.
    #[strum(serialize = "ISO/IEC 42001")]
    Iso42001,
    /// Transparency obligations.
    #[strum(serialize = "EU AI Act Art. 13")]
    EuAiActArt13,
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: Actor,
    pub action: AuditAction,
    pub details: String,
    pub status: AuditStatus,
    pub compliance_standard: ComplianceStandard,
    /// Hash of the entry recorded just before this one.
    pub prev_hash: String,
    /// SHA-256 over this entry's canonical form, hex encoded.
    pub hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn action_names_are_upper_snake() {
        assert_eq!(AuditAction::SecurityBlock.to_string(), "SECURITY_BLOCK");
        assert_eq!(
            AuditAction::from_str("KNOWLEDGE_GAP").unwrap(),
            AuditAction::KnowledgeGap
        );
        assert_eq!(
            serde_json::to_string(&AuditAction::ToolExecution).unwrap(),
            "\"TOOL_EXECUTION\""
        );
    }

    #[test]
    fn standards_display_human_names() {
        assert_eq!(ComplianceStandard::Iso42001.to_string(), "ISO/IEC 42001");
        assert_eq!(ComplianceStandard::EuAiActArt13.to_string(), "EU AI Act Art. 13");
    }
}

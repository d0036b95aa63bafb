// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based compliance tagging.

use crate::types::{AuditAction, ComplianceStandard};

/// Lowercase markers of privacy-related details.
const PRIVACY_MARKERS: [&str; 4] = ["pii", "redact", "personal data", "forget me"];

/// Maps an event to a compliance standard. First matching rule wins:
///
/// 1. security block: NIST AI RMF
/// 2. details mention PII or redaction: GDPR
/// 3. tool execution: ISO/IEC 42001
/// 4. knowledge gap: ISO/IEC 42001
/// 5. anything else: EU AI Act Art. 13
pub fn classify(action: AuditAction, details: &str) -> ComplianceStandard {
    if action == AuditAction::SecurityBlock {
        return ComplianceStandard::NistAiRmf;
    }
    let details = details.to_lowercase();
    if PRIVACY_MARKERS.iter().any(|m| details.contains(m)) {
        return ComplianceStandard::Gdpr;
    }
    match action {
        AuditAction::ToolExecution | AuditAction::KnowledgeGap => ComplianceStandard::Iso42001,
        _ => ComplianceStandard::EuAiActArt13,
    }
}

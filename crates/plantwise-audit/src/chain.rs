// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hash chain over audit entries.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::{Actor, AuditAction, AuditEntry, AuditStatus, ComplianceStandard};

/// `prev_hash` of the first entry after an empty log.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Canonical form hashed for each entry. Field order is fixed.
#[derive(Serialize)]
struct Canonical<'a> {
    id: &'a str,
    timestamp: String,
    actor: Actor,
    action: AuditAction,
    details: &'a str,
    status: AuditStatus,
    compliance_standard: ComplianceStandard,
    prev_hash: &'a str,
}

/// SHA-256 of the entry's canonical JSON (all fields except `hash`), hex encoded.
pub fn compute_hash(entry: &AuditEntry) -> String {
    let canonical = Canonical {
        id: &entry.id,
        timestamp: entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Nanos, true),
        actor: entry.actor,
        action: entry.action,
        details: &entry.details,
        status: entry.status,
        compliance_standard: entry.compliance_standard,
        prev_hash: &entry.prev_hash,
    };
    // Serializing a struct of strings and unit enums cannot fail.
    let bytes = serde_json::to_vec(&canonical).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}

/// Where and why verification failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBreak {
    pub entry_id: String,
    pub reason: String,
}

/// Verifies entries stored newest first.
///
/// Every digest is recomputed, and each entry's `prev_hash` must equal the
/// hash of the next older retained entry. The oldest retained entry may point
/// at an evicted one.
pub fn verify_chain(entries_newest_first: &[AuditEntry]) -> Result<(), ChainBreak> {
    for (i, entry) in entries_newest_first.iter().enumerate() {
        if compute_hash(entry) != entry.hash {
            return Err(ChainBreak {
                entry_id: entry.id.clone(),
                reason: "content does not match its hash".into(),
            });
        }
        if let Some(older) = entries_newest_first.get(i + 1) {
            if entry.prev_hash != older.hash {
                return Err(ChainBreak {
                    entry_id: entry.id.clone(),
                    reason: format!("prev_hash does not link to entry {}", older.id),
                });
            }
        }
    }
    Ok(())
}

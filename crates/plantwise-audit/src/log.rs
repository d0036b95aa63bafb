// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The capped, persisted audit log.

use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use plantwise_core::{AUDIT_KEY, SessionStore};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::chain::{ChainBreak, GENESIS_HASH, compute_hash, verify_chain};
use crate::classify::classify;
use crate::types::{Actor, AuditAction, AuditEntry, AuditStatus, ComplianceStandard};

/// Entries retained when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 50;

/// Audit log holding at most `capacity` entries, newest first.
///
/// Persistence failures never fail [`record`](Self::record). They are logged
/// and kept for [`take_storage_warning`](Self::take_storage_warning).
pub struct AuditLog {
    capacity: usize,
    entries: Mutex<Vec<AuditEntry>>,
    store: Option<Arc<dyn SessionStore>>,
    storage_warning: StdMutex<Option<String>>,
}

impl AuditLog {
    /// A log that is not persisted.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Vec::new()),
            store: None,
            storage_warning: StdMutex::new(None),
        }
    }

    /// A log mirrored to `store` under [`AUDIT_KEY`].
    pub fn with_store(capacity: usize, store: Arc<dyn SessionStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::new(capacity)
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends an entry. `standard` overrides the rule-based tag.
    pub async fn record(
        &self,
        actor: Actor,
        action: AuditAction,
        details: impl Into<String>,
        status: AuditStatus,
        standard: Option<ComplianceStandard>,
    ) -> AuditEntry {
        let details = details.into();
        let compliance_standard = standard.unwrap_or_else(|| classify(action, &details));

        let mut entries = self.entries.lock().await;
        let prev_hash = entries
            .first()
            .map(|e| e.hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());

        let mut entry = AuditEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            actor,
            action,
            details,
            status,
            compliance_standard,
            prev_hash,
            hash: String::new(),
        };
        entry.hash = compute_hash(&entry);

        info!(
            actor = %entry.actor,
            action = %entry.action,
            status = %entry.status,
            standard = %entry.compliance_standard,
            details = %entry.details,
            "audit"
        );

        entries.insert(0, entry.clone());
        entries.truncate(self.capacity);
        self.persist(&entries).await;
        entry
    }

    /// Snapshot of all retained entries, newest first.
    pub async fn read(&self) -> Vec<AuditEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Drops every entry, in memory and in the store.
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        entries.clear();
        if let Some(store) = &self.store {
            if let Err(e) = store.remove(AUDIT_KEY).await {
                self.note_storage_failure(format!("audit log could not be cleared: {e}"));
            }
        }
        debug!("audit log cleared");
    }

    /// Checks digests and chain links of the retained entries.
    pub async fn verify(&self) -> Result<(), ChainBreak> {
        verify_chain(&self.entries.lock().await)
    }

    /// Loads a previously persisted log, replacing the in-memory entries.
    ///
    /// Returns the number of entries restored. Unreadable data is treated as
    /// an empty log.
    pub async fn restore(&self) -> usize {
        let Some(store) = &self.store else {
            return 0;
        };
        let raw = match store.get(AUDIT_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return 0,
            Err(e) => {
                self.note_storage_failure(format!("audit log could not be read: {e}"));
                return 0;
            }
        };
        match serde_json::from_str::<Vec<AuditEntry>>(&raw) {
            Ok(mut restored) => {
                restored.truncate(self.capacity);
                let count = restored.len();
                *self.entries.lock().await = restored;
                debug!(count, "audit log restored");
                count
            }
            Err(e) => {
                warn!(error = %e, "persisted audit log is corrupt, starting empty");
                0
            }
        }
    }

    /// Returns and clears the last persistence failure, if any.
    pub fn take_storage_warning(&self) -> Option<String> {
        self.storage_warning
            .lock()
            .ok()
            .and_then(|mut warning| warning.take())
    }

    async fn persist(&self, entries: &[AuditEntry]) {
        let Some(store) = &self.store else {
            return;
        };
        let result = match serde_json::to_string(entries) {
            Ok(json) => store.put(AUDIT_KEY, json).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(e) = result {
            self.note_storage_failure(format!("audit log could not be persisted: {e}"));
        }
    }

    fn note_storage_failure(&self, message: String) {
        warn!(%message, "audit persistence degraded");
        if let Ok(mut warning) = self.storage_warning.lock() {
            *warning = Some(message);
        }
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

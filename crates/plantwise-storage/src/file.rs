// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-file session store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use plantwise_core::{AdapterType, HealthStatus, PlantwiseError, PluginAdapter, SessionStore};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Session store persisted as one JSON object in a file.
///
/// The whole map is rewritten on every change through a temporary file and
/// a rename, so a crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct JsonFileSessionStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileSessionStore {
    /// Opens `path`, loading existing values. A missing file starts empty.
    /// A corrupt file is logged and also starts empty.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PlantwiseError> {
        let path = path.as_ref().to_path_buf();
        let values: BTreeMap<String, String> = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "session file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(PlantwiseError::storage(e)),
        };
        debug!(path = %path.display(), keys = values.len(), "session store opened");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), PlantwiseError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(PlantwiseError::storage)?;
            }
        }
        let json = serde_json::to_string_pretty(values).map_err(PlantwiseError::storage)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(PlantwiseError::storage)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(PlantwiseError::storage)
    }
}

#[async_trait]
impl PluginAdapter for JsonFileSessionStore {
    fn name(&self) -> &str {
        "json-file"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SessionStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PlantwiseError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => Ok(
                HealthStatus::Degraded(format!("{} does not exist yet", dir.display())),
            ),
            _ => Ok(HealthStatus::Healthy),
        }
    }

    async fn shutdown(&self) -> Result<(), PlantwiseError> {
        let values = self.values.lock().await;
        self.flush(&values).await
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PlantwiseError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), PlantwiseError> {
        let mut values = self.values.lock().await;
        values.insert(key.to_string(), value);
        self.flush(&values).await
    }

    async fn remove(&self, key: &str) -> Result<(), PlantwiseError> {
        let mut values = self.values.lock().await;
        if values.remove(key).is_some() {
            self.flush(&values).await?;
        }
        Ok(())
    }
}

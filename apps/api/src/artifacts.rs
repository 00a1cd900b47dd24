//! Artifact store: generated documents kept for download.
//!
//! Every export lands in its own directory `<root>/<uuid>/<filename>`, so
//! concurrent requests never overwrite each other's output. Entries expire
//! after the configured TTL; expired entries are purged on the next store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tempfile::TempDir;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::resume::export::ExportedDocument;

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct ArtifactEntry {
    info: ArtifactInfo,
    path: PathBuf,
}

#[derive(Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    ttl: TimeDelta,
    index: Arc<RwLock<HashMap<Uuid, ArtifactEntry>>>,
    // Keeps a process-scoped root alive; removed on drop.
    _temp_root: Option<Arc<TempDir>>,
}

impl ArtifactStore {
    /// Uses `root` when given, otherwise a fresh temporary directory.
    pub fn new(root: Option<&Path>, ttl_secs: u64) -> Result<Self> {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .context("ARTIFACT_TTL_SECS is too large")?;

        let (root, temp_root) = match root {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create artifact dir {}", dir.display()))?;
                (dir.to_path_buf(), None)
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("resume-artifacts-")
                    .tempdir()
                    .context("Failed to create temporary artifact dir")?;
                (temp.path().to_path_buf(), Some(Arc::new(temp)))
            }
        };

        Ok(Self {
            root,
            ttl,
            index: Arc::new(RwLock::new(HashMap::new())),
            _temp_root: temp_root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn store(&self, document: &ExportedDocument) -> Result<ArtifactInfo> {
        self.purge_expired().await;

        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .context("Artifact expiry is out of range")?;

        let id = Uuid::new_v4();
        let dir = self.root.join(id.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(document.filename);
        tokio::fs::write(&path, &document.bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        let info = ArtifactInfo {
            id,
            filename: document.filename.to_string(),
            content_type: document.content_type.to_string(),
            size_bytes: document.bytes.len(),
            expires_at,
        };
        self.index.write().await.insert(
            id,
            ArtifactEntry {
                info: info.clone(),
                path,
            },
        );
        debug!("Stored artifact {id} ({} bytes)", info.size_bytes);

        Ok(info)
    }

    /// Returns the artifact and its bytes, or `None` if unknown or expired.
    pub async fn fetch(&self, id: Uuid) -> Result<Option<(ArtifactInfo, Vec<u8>)>> {
        let entry = match self.index.read().await.get(&id) {
            Some(entry) if entry.info.expires_at > Utc::now() => entry.clone(),
            _ => return Ok(None),
        };

        let bytes = tokio::fs::read(&entry.path)
            .await
            .with_context(|| format!("Failed to read artifact {}", entry.path.display()))?;
        Ok(Some((entry.info, bytes)))
    }

    async fn purge_expired(&self) {
        let now = Utc::now();
        let expired: Vec<Uuid> = {
            let mut index = self.index.write().await;
            let ids: Vec<Uuid> = index
                .iter()
                .filter(|(_, e)| e.info.expires_at <= now)
                .map(|(id, _)| *id)
                .collect();
            for id in &ids {
                index.remove(id);
            }
            ids
        };

        for id in expired {
            let dir = self.root.join(id.to_string());
            if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
                warn!("Failed to remove expired artifact {}: {e}", dir.display());
            }
        }
    }
}

//! Local download index answering "is this album fully downloaded"

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::status::StatusProbe;

pub const DOWNLOAD_INDEX_FILE: &str = ".cache/downloads.json";

/// Per-album download progress read from disk.
///
/// The file maps album ids to `[downloaded, total]` track counts, written by
/// whatever downloader runs alongside the search UI.
#[derive(Clone)]
pub struct DownloadIndex {
    path: PathBuf,
    progress: Arc<RwLock<HashMap<String, (u32, u32)>>>,
    loaded: Arc<RwLock<bool>>,
}

impl DownloadIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            progress: Arc::new(RwLock::new(HashMap::new())),
            loaded: Arc::new(RwLock::new(false)),
        }
    }

    /// Re-read the index file. A missing file leaves the index empty.
    pub async fn load_from_disk(&self) -> Result<()> {
        let path = Path::new(&self.path);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No download index on disk");
            return Ok(());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let entries: HashMap<String, (u32, u32)> = serde_json::from_str(&content)?;
        tracing::debug!(albums = entries.len(), "Download index loaded");

        *self.progress.write().await = entries;
        *self.loaded.write().await = true;
        Ok(())
    }

    pub async fn is_loaded(&self) -> bool {
        *self.loaded.read().await
    }

    pub async fn is_complete(&self, album_id: &str) -> Option<bool> {
        self.progress
            .read()
            .await
            .get(album_id)
            .map(|(downloaded, total)| *total > 0 && downloaded >= total)
    }
}

impl Default for DownloadIndex {
    fn default() -> Self {
        Self::new(DOWNLOAD_INDEX_FILE)
    }
}

#[async_trait]
impl StatusProbe for DownloadIndex {
    type Key = String;
    type Value = bool;

    async fn probe(&self, key: &String) -> Result<bool> {
        if !self.is_loaded().await {
            return Err(anyhow!("download index not loaded"));
        }
        // Albums absent from a loaded index are known not to be downloaded
        Ok(self.is_complete(key).await.unwrap_or(false))
    }
}

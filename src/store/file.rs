//! JSON-file durable store.
//!
//! Rows live in memory behind a mutex and the whole table is rewritten to
//! disk after each mutation (tmp file + rename, so readers never see a
//! half-written file). The mutex makes insert-or-ignore atomic within the
//! process; it does not coordinate multiple processes sharing one file.
//!
//! A mutation whose save fails is rolled back, so memory never runs ahead
//! of disk. Every durable hit rewrites the whole file while holding the
//! table lock, which keeps this backend suited to small tables and light
//! traffic.

// TODO: batch `record_hit` bookkeeping into a periodic flush instead of one
// rewrite per hit.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{PersistedResult, SignatureStore};
use crate::{LarderError, Result};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Default path: `~/.cache/larder/signatures.json`.
pub fn default_store_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("larder")
        .join("signatures.json")
}

/// Versioned wrapper for the on-disk table.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    rows: Vec<PersistedResult>,
}

/// [`SignatureStore`] persisted as a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    rows: Mutex<HashMap<String, PersistedResult>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file opens empty. An unreadable or corrupt file is a
    /// [`LarderError::Storage`] error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows = match tokio::fs::read_to_string(&path).await {
            Ok(content) => parse_rows(&path, &content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no store file yet, starting empty");
                HashMap::new()
            }
            Err(e) => {
                return Err(LarderError::Storage(format!(
                    "failed to read store file {}: {e}",
                    path.display()
                )));
            }
        };
        info!(path = %path.display(), rows = rows.len(), "opened signature store");
        Ok(Self {
            path,
            rows: Mutex::new(rows),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn parse_rows(path: &Path, content: &str) -> Result<HashMap<String, PersistedResult>> {
    let file: StoreFile = serde_json::from_str(content).map_err(|e| {
        LarderError::Storage(format!("corrupt store file {}: {e}", path.display()))
    })?;
    if file.version > FORMAT_VERSION {
        return Err(LarderError::Storage(format!(
            "unsupported store version {} (max supported: {FORMAT_VERSION})",
            file.version
        )));
    }
    Ok(file
        .rows
        .into_iter()
        .map(|row| (row.signature_hash.clone(), row))
        .collect())
}

/// Write the table atomically via tmp + rename.
async fn save(path: &Path, rows: &HashMap<String, PersistedResult>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            LarderError::Storage(format!(
                "failed to create store dir {}: {e}",
                parent.display()
            ))
        })?;
    }

    let mut sorted: Vec<PersistedResult> = rows.values().cloned().collect();
    sorted.sort_by(|a, b| a.signature_hash.cmp(&b.signature_hash));
    let json = serde_json::to_string_pretty(&StoreFile {
        version: FORMAT_VERSION,
        rows: sorted,
    })?;

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json).await.map_err(|e| {
        LarderError::Storage(format!(
            "failed to write store file {}: {e}",
            tmp_path.display()
        ))
    })?;
    tokio::fs::rename(&tmp_path, path).await.map_err(|e| {
        LarderError::Storage(format!(
            "failed to rename store file {} → {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })?;
    Ok(())
}

#[async_trait]
impl SignatureStore for JsonFileStore {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn fetch(&self, hash: &str) -> Result<Option<PersistedResult>> {
        Ok(self.rows.lock().await.get(hash).cloned())
    }

    async fn insert_if_absent(&self, row: PersistedResult) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&row.signature_hash) {
            return Ok(false);
        }
        let hash = row.signature_hash.clone();
        rows.insert(hash.clone(), row);
        if let Err(e) = save(&self.path, &rows).await {
            // Keep memory and disk consistent: an unpersisted row was never inserted.
            rows.remove(&hash);
            return Err(e);
        }
        Ok(true)
    }

    async fn record_hit(&self, hash: &str, at: SystemTime) -> Result<()> {
        let mut rows = self.rows.lock().await;
        let Some(row) = rows.get_mut(hash) else {
            return Ok(());
        };
        let previous = (row.hit_count, row.last_accessed_at);
        row.hit_count += 1;
        row.last_accessed_at = at;

        if let Err(e) = save(&self.path, &rows).await {
            if let Some(row) = rows.get_mut(hash) {
                (row.hit_count, row.last_accessed_at) = previous;
            }
            return Err(e);
        }
        Ok(())
    }
}

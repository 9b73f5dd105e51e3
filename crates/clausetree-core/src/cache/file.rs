//! Directory-backed cache with integrity verification on read.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::key::{cache_key, content_digest};
use super::{CacheError, CacheResult, TreeCache};
use crate::model::ClauseTree;

const TREE_FILE: &str = "tree.json";
const META_FILE: &str = "metadata.json";

/// Metadata stored alongside each cached tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeCacheMeta {
    pub cached_at: DateTime<Utc>,

    /// Digest of `tree.json` (sha256:...).
    pub digest: String,

    pub subject_key: String,

    pub language: String,

    /// Absent means the entry never expires.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct FileTreeCache {
    cache_dir: PathBuf,
    ttl: Option<Duration>,
    /// Keeps `tree.json` and `metadata.json` of one entry from two writers apart.
    write_lock: Arc<Mutex<()>>,
}

impl FileTreeCache {
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ttl: None,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Expire entries `secs` seconds after they are written.
    pub fn with_ttl_secs(mut self, secs: i64) -> Self {
        self.ttl = Some(Duration::seconds(secs));
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_dir(&self, subject_key: &str, language: &str) -> PathBuf {
        self.cache_dir.join(cache_key(subject_key, language))
    }

    /// Read an entry's metadata without loading the tree.
    pub async fn metadata(&self, subject_key: &str, language: &str) -> Option<TreeCacheMeta> {
        let meta_path = self.entry_dir(subject_key, language).join(META_FILE);
        let content = fs::read_to_string(&meta_path).await.ok()?;
        serde_json::from_str(&content).ok()
    }
}

/// Write via a uniquely named sibling temp file, then rename into place.
/// The temp file is removed if anything fails before the rename.
async fn write_atomic(path: &Path, content: &str) -> CacheResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let temp_path = tempfile::Builder::new()
        .prefix(".write-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| CacheError::Io {
            message: format!("failed to create temp file: {}", e),
        })?
        .into_temp_path();

    fs::write(&temp_path, content)
        .await
        .map_err(|e| CacheError::Io {
            message: format!("failed to write temp file: {}", e),
        })?;

    temp_path.persist(path).map_err(|e| CacheError::Io {
        message: format!("failed to rename temp file: {}", e.error),
    })?;

    Ok(())
}

#[async_trait]
impl TreeCache for FileTreeCache {
    async fn get_cached(
        &self,
        subject_key: &str,
        language: &str,
    ) -> CacheResult<Option<ClauseTree>> {
        let dir = self.entry_dir(subject_key, language);
        let tree_path = dir.join(TREE_FILE);
        let meta_path = dir.join(META_FILE);

        if !tree_path.exists() || !meta_path.exists() {
            debug!(subject = subject_key, language, "tree not in cache");
            return Ok(None);
        }

        let meta_content = fs::read_to_string(&meta_path)
            .await
            .map_err(|e| CacheError::Io {
                message: format!("failed to read cache metadata: {}", e),
            })?;
        let metadata: TreeCacheMeta =
            serde_json::from_str(&meta_content).map_err(|e| CacheError::Corrupt {
                subject: subject_key.to_string(),
                message: format!("failed to parse cache metadata: {}", e),
            })?;

        if let Some(expires_at) = metadata.expires_at {
            if expires_at < Utc::now() {
                debug!(
                    subject = subject_key,
                    language,
                    expires_at = %expires_at,
                    "cache entry expired"
                );
                return Ok(None);
            }
        }

        let content = fs::read_to_string(&tree_path)
            .await
            .map_err(|e| CacheError::Io {
                message: format!("failed to read cached tree: {}", e),
            })?;

        let actual = content_digest(&content);
        if actual != metadata.digest {
            warn!(
                subject = subject_key,
                language,
                expected = %metadata.digest,
                actual = %actual,
                "cache integrity check failed"
            );
            return Err(CacheError::DigestMismatch {
                subject: subject_key.to_string(),
                expected: metadata.digest,
                actual,
            });
        }

        let tree = serde_json::from_str(&content).map_err(|e| CacheError::Corrupt {
            subject: subject_key.to_string(),
            message: e.to_string(),
        })?;

        debug!(subject = subject_key, language, "cache hit");
        Ok(Some(tree))
    }

    async fn put(&self, tree: &ClauseTree, language: &str) -> CacheResult<()> {
        let dir = self.entry_dir(&tree.subject_reference, language);

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| CacheError::Io {
                message: format!("failed to create cache directory: {}", e),
            })?;

        let content = serde_json::to_string_pretty(tree)?;
        let _guard = self.write_lock.lock().await;
        let now = Utc::now();
        let metadata = TreeCacheMeta {
            cached_at: now,
            digest: content_digest(&content),
            subject_key: tree.subject_reference.clone(),
            language: language.to_string(),
            expires_at: self.ttl.map(|ttl| now + ttl),
        };

        write_atomic(&dir.join(TREE_FILE), &content).await?;
        let meta_json = serde_json::to_string_pretty(&metadata)?;
        write_atomic(&dir.join(META_FILE), &meta_json).await?;

        debug!(
            subject = %tree.subject_reference,
            language,
            "cached tree"
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

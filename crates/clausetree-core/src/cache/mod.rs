//! Long-term storage for validated trees.
//!
//! Entries are keyed by subject reference and language. Both backends store
//! the serialized tree and hand back a byte-identical reconstruction.
//!
//! # File Cache Structure
//!
//! ```text
//! {cache_dir}/{sha256(subject + "\n" + language)}/
//!   tree.json        # Serialized ClauseTree
//!   metadata.json    # Cache metadata
//! ```

use async_trait::async_trait;

use crate::model::ClauseTree;

mod file;
mod key;
mod memory;

pub use file::{FileTreeCache, TreeCacheMeta};
pub use key::{cache_key, content_digest};
pub use memory::MemoryTreeCache;

/// Cache errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache IO failed: {message}")]
    Io { message: String },

    #[error("cache entry for `{subject}` is not valid: {message}")]
    Corrupt { subject: String, message: String },

    #[error("cache integrity check failed for `{subject}`: expected {expected}, got {actual}")]
    DigestMismatch {
        subject: String,
        expected: String,
        actual: String,
    },

    #[error("failed to serialize tree: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Async storage collaborator for clause trees.
#[async_trait]
pub trait TreeCache: Send + Sync {
    /// Look up a tree by subject reference and language.
    async fn get_cached(&self, subject_key: &str, language: &str)
        -> CacheResult<Option<ClauseTree>>;

    /// Store `tree` under its own `subject_reference` and `language`.
    async fn put(&self, tree: &ClauseTree, language: &str) -> CacheResult<()>;

    fn backend_name(&self) -> &'static str;
}

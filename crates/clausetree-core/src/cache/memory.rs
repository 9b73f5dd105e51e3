use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheError, CacheResult, TreeCache};
use crate::model::ClauseTree;

/// In-process cache holding serialized trees.
#[derive(Debug, Clone, Default)]
pub struct MemoryTreeCache {
    entries: Arc<RwLock<HashMap<(String, String), String>>>,
}

impl MemoryTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl TreeCache for MemoryTreeCache {
    async fn get_cached(
        &self,
        subject_key: &str,
        language: &str,
    ) -> CacheResult<Option<ClauseTree>> {
        let entries = self.entries.read().await;
        let Some(json) = entries.get(&(subject_key.to_string(), language.to_string())) else {
            return Ok(None);
        };
        serde_json::from_str(json)
            .map(Some)
            .map_err(|e| CacheError::Corrupt {
                subject: subject_key.to_string(),
                message: e.to_string(),
            })
    }

    async fn put(&self, tree: &ClauseTree, language: &str) -> CacheResult<()> {
        let json = serde_json::to_string(tree)?;
        self.entries.write().await.insert(
            (tree.subject_reference.clone(), language.to_string()),
            json,
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

//! Analysis orchestration.
//!
//! Resolves a subject to a validated tree with the following priority:
//! 1. Cache (unless disabled or refreshing)
//! 2. Generation, followed by the validation pipeline
//!
//! A freshly validated tree is written back to the cache in a spawned task.
//! The caller never waits on that write and its failure is only logged.
//! Writes run detached on the runtime, so they outlive the service.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::TreeCache;
use crate::config::EngineConfig;
use crate::diagnostic::Diagnostics;
use crate::error::{AnalysisError, AnalysisResult};
use crate::model::{ClauseTree, Token};
use crate::pipeline::validate_response;
use crate::providers::TextGenerator;

/// One analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Subject reference, also the cache key.
    pub subject_key: String,
    /// Overrides the configured language.
    pub language: Option<String>,
    /// Fully rendered prompt for the generator.
    pub prompt: String,
    pub tokens: Vec<Token>,
}

impl AnalysisRequest {
    pub fn new(subject_key: impl Into<String>, prompt: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            subject_key: subject_key.into(),
            language: None,
            prompt: prompt.into(),
            tokens,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Where an analysis result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Cache,
    Generated,
}

impl std::fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Generated => write!(f, "generated"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub tree: ClauseTree,
    /// Empty for cache hits.
    pub diagnostics: Diagnostics,
    pub source: AnalysisSource,
}

pub struct ClauseTreeService {
    config: EngineConfig,
    generator: Arc<dyn TextGenerator>,
    cache: Option<Arc<dyn TreeCache>>,
    pending_writes: Mutex<Vec<JoinHandle<()>>>,
}

impl ClauseTreeService {
    pub fn new(config: EngineConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config,
            generator,
            cache: None,
            pending_writes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn TreeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> AnalysisResult<Analysis> {
        let language = request
            .language
            .clone()
            .unwrap_or_else(|| self.config.language.clone());
        let subject = request.subject_key.as_str();

        let cache = self.cache.as_ref().filter(|_| self.config.use_cache);

        if let Some(cache) = cache.filter(|_| !self.config.refresh) {
            match cache.get_cached(subject, &language).await {
                Ok(Some(tree)) => {
                    info!(subject, language = %language, backend = cache.backend_name(), "cache hit");
                    return Ok(Analysis {
                        tree,
                        diagnostics: Diagnostics::new(),
                        source: AnalysisSource::Cache,
                    });
                }
                Ok(None) => debug!(subject, language = %language, "cache miss"),
                Err(e) => warn!(
                    subject,
                    language = %language,
                    error = %e,
                    "cache lookup failed, treating as miss"
                ),
            }
        }

        debug!(subject, provider = self.generator.provider_name(), "generating analysis");
        let raw = self
            .generator
            .generate_syntax_analysis(&request.prompt)
            .await
            .map_err(|e| AnalysisError::Generation {
                provider: self.generator.provider_name().to_string(),
                message: format!("{:#}", e),
            })?;

        let validated = validate_response(&raw, &request.tokens, subject, &self.config)?;
        info!(
            subject,
            clauses = validated.tree.clauses.len(),
            diagnostics = validated.diagnostics.len(),
            "analysis validated"
        );

        if let Some(cache) = cache {
            self.spawn_cache_write(Arc::clone(cache), validated.tree.clone(), language);
        }

        Ok(Analysis {
            tree: validated.tree,
            diagnostics: validated.diagnostics,
            source: AnalysisSource::Generated,
        })
    }

    fn spawn_cache_write(&self, cache: Arc<dyn TreeCache>, tree: ClauseTree, language: String) {
        let handle = tokio::spawn(async move {
            match cache.put(&tree, &language).await {
                Ok(()) => debug!(subject = %tree.subject_reference, language = %language, "cache write complete"),
                Err(e) => warn!(
                    subject = %tree.subject_reference,
                    language = %language,
                    error = %e,
                    "cache write failed"
                ),
            }
        });

        let mut pending = self
            .pending_writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Wait for outstanding cache writes. Short-lived processes call this
    /// before the runtime shuts down; dropping the service does not cancel them.
    pub async fn flush(&self) {
        let handles = std::mem::take(
            &mut *self
                .pending_writes
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "cache write task failed");
            }
        }
    }
}

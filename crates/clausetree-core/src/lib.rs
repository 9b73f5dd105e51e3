//! Clause-tree construction and validation for generated syntax analyses.
//!
//! A text generator is asked to split a passage into clauses and returns
//! free-form text that is supposed to be JSON. This crate turns that text
//! into a [`ClauseTree`] it can vouch for:
//!
//! - markdown fencing and `undefined` literals are cleaned up
//! - truncated output is detected before decoding
//! - clause types are mapped onto a closed set of [`ClauseKind`]s
//! - every token is owned by exactly one clause
//! - parent/root references are checked under a configurable policy
//!
//! Non-fatal findings are returned as [`Diagnostics`] next to the tree.
//!
//! # Quick Start
//!
//! ```
//! use clausetree_core::{tokens_from_text, validate_response, EngineConfig};
//!
//! let tokens = tokens_from_text("In the beginning");
//! let raw = r#"{"clauses": [{"id": "c1", "type": "independent", "wordIndices": [0, 1, 2]}],
//!  "rootClauseId": "c1", "structureDescription": "A single clause."}"#;
//!
//! let validated = validate_response(raw, &tokens, "Gen 1:1", &EngineConfig::default())?;
//! assert_eq!(validated.tree.clauses.len(), 1);
//! # Ok::<(), clausetree_core::AnalysisError>(())
//! ```
//!
//! # Orchestration
//!
//! [`ClauseTreeService`] wraps the pipeline with a [`TreeCache`] lookup before
//! generation and a background cache write afterwards.
//!
//! # Features
//!
//! - `openai`: `OpenAiGenerator`, an HTTP
//!   client for OpenAI-compatible endpoints. Off by default, so the validation
//!   library itself never touches the network.

pub mod cache;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod kind;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod response;
pub mod service;
pub mod tree;

pub use cache::{CacheError, CacheResult, FileTreeCache, MemoryTreeCache, TreeCache};
pub use config::{load_config, ConfigError, EngineConfig, ReferencePolicy};
pub use diagnostic::{codes, Diagnostic, Diagnostics, Severity};
pub use error::{AnalysisError, AnalysisResult, MissingToken};
pub use kind::{classify, resolve_clause_type, KindResolution, MatchPath};
pub use model::{tokens_from_text, tokens_from_words, Clause, ClauseKind, ClauseTree, Token};
pub use pipeline::{validate_response, Stage, ValidatedTree};
#[cfg(feature = "openai")]
pub use providers::OpenAiGenerator;
pub use providers::{FakeGenerator, TextGenerator};
pub use response::{detect_truncation, is_truncated, sanitize_response, TruncationReason};
pub use service::{Analysis, AnalysisRequest, AnalysisSource, ClauseTreeService};

//! Non-fatal findings collected while validating a response.
//!
//! Diagnostics travel with the validated tree so callers can surface them
//! without scraping log output. Every diagnostic is also mirrored to
//! `tracing` at `warn` level when recorded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub source: String,
    pub message: String,
    pub context: serde_json::Value,
}

impl Diagnostic {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity: Severity::Warn,
            source: "pipeline".into(),
            message: message.into(),
            context: serde_json::json!({}),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    pub fn format_terminal(&self) -> String {
        let tag = match self.severity {
            Severity::Warn => "warn",
        };
        let mut s = format!("{}: [{}] {}\n", tag, self.code, self.message);
        s.push_str(&format!("  source: {}\n", self.source));

        if self.context.as_object().is_some_and(|o| !o.is_empty()) {
            if let Ok(json) = serde_json::to_string_pretty(&self.context) {
                for line in json.lines() {
                    s.push_str(&format!("  {}\n", line));
                }
            }
        }
        s
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Ordered collection of diagnostics for one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        tracing::warn!(
            code = %diag.code,
            source = %diag.source,
            "{}",
            diag.message
        );
        self.0.push(diag);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.0.iter().any(|d| d.code == code)
    }

    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.0.iter().filter(move |d| d.code == code)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub mod codes {
    pub const W_KIND_PREFIX_MATCH: &str = "W_KIND_PREFIX_MATCH";
    pub const W_KIND_FALLBACK: &str = "W_KIND_FALLBACK";
    pub const W_DUPLICATE_CLAIM: &str = "W_DUPLICATE_CLAIM";
    pub const W_DANGLING_PARENT: &str = "W_DANGLING_PARENT";
    pub const W_MISSING_ROOT: &str = "W_MISSING_ROOT";
    pub const W_PARENT_CYCLE: &str = "W_PARENT_CYCLE";
    pub const W_MAIN_INDEX_DROPPED: &str = "W_MAIN_INDEX_DROPPED";
    pub const W_DUPLICATE_CLAUSE_ID: &str = "W_DUPLICATE_CLAUSE_ID";
}

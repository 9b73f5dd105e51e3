//! Error types for clause-tree analysis.

use crate::response::truncation::TruncationReason;
use serde::Serialize;

/// A token index no clause claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingToken {
    pub index: usize,
    pub text: String,
}

/// Analysis errors.
///
/// Every variant except `Generation` belongs to the validation taxonomy and
/// carries enough detail to render a message without the raw response.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The response looks cut off before the JSON document completed.
    #[error(
        "response appears truncated ({reason}); the analysis was cut off, try a shorter passage"
    )]
    TruncatedResponse {
        reason: TruncationReason,
        length: usize,
    },

    /// The sanitized response is not valid JSON.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// A required top-level field is missing or malformed.
    #[error("response structure invalid: field `{field}` {reason}")]
    Structure { field: String, reason: String },

    /// A clause declared a token index outside `[0, N)`.
    #[error(
        "clause `{clause_id}` references token index {index}, outside the valid range {}",
        range_label(*token_count)
    )]
    IndexOutOfRange {
        clause_id: String,
        index: i64,
        token_count: usize,
    },

    /// Some token indices were never claimed by any clause.
    #[error("incomplete coverage: {} token(s) not assigned to any clause: {}", missing.len(), missing_label(missing))]
    IncompleteCoverage { missing: Vec<MissingToken> },

    /// Parent/root references are dangling or cyclic (strict reference policy only).
    #[error("clause `{clause_id}` has an invalid reference to `{reference}`: {reason}")]
    Reference {
        clause_id: String,
        reference: String,
        reason: String,
    },

    /// The text generation collaborator failed.
    #[error("text generation failed ({provider}): {message}")]
    Generation { provider: String, message: String },
}

fn range_label(token_count: usize) -> String {
    if token_count == 0 {
        "(empty: no tokens)".to_string()
    } else {
        format!("0-{}", token_count - 1)
    }
}

fn missing_label(missing: &[MissingToken]) -> String {
    missing
        .iter()
        .map(|m| format!("{} \"{}\"", m.index, m.text))
        .collect::<Vec<_>>()
        .join(", ")
}

impl AnalysisError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TruncatedResponse { .. } => "E_TRUNCATED",
            Self::Parse { .. } => "E_PARSE",
            Self::Structure { .. } => "E_STRUCTURE",
            Self::IndexOutOfRange { .. } => "E_INDEX_RANGE",
            Self::IncompleteCoverage { .. } => "E_COVERAGE",
            Self::Reference { .. } => "E_REFERENCE",
            Self::Generation { .. } => "E_GENERATION",
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Generation { .. } => 3,
            _ => 1,
        }
    }

    /// Whether retrying with different input (e.g. a shorter passage) is
    /// the suggested remedy.
    pub fn is_user_actionable(&self) -> bool {
        matches!(self, Self::TruncatedResponse { .. })
    }

    pub(crate) fn parse(err: &serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }

    pub(crate) fn structure(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Structure {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

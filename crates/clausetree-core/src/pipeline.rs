//! Synchronous validation of one raw response against a token sequence.
//!
//! Stages run strictly forward: sanitize, truncation check, decode,
//! structure check, type resolution and tree build, coverage check,
//! reference check. The first fatal stage ends the run.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::diagnostic::Diagnostics;
use crate::error::{AnalysisError, AnalysisResult};
use crate::model::{ClauseTree, Token};
use crate::response::{decode, detect_truncation, sanitize_response, validate_structure};
use crate::tree::{build_clauses, check_references, validate_coverage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Sanitize,
    TruncationCheck,
    Decode,
    StructureCheck,
    TreeBuild,
    CoverageCheck,
    ReferenceCheck,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Sanitize => "sanitize",
            Stage::TruncationCheck => "truncation_check",
            Stage::Decode => "decode",
            Stage::StructureCheck => "structure_check",
            Stage::TreeBuild => "tree_build",
            Stage::CoverageCheck => "coverage_check",
            Stage::ReferenceCheck => "reference_check",
        })
    }
}

/// A tree that passed every check, with the non-fatal findings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedTree {
    pub tree: ClauseTree,
    pub diagnostics: Diagnostics,
    /// `owners[i]` is the id of the clause owning token `i`.
    pub owners: Vec<String>,
}

/// Run the full validation pipeline over `raw`.
pub fn validate_response(
    raw: &str,
    tokens: &[Token],
    subject: &str,
    config: &EngineConfig,
) -> AnalysisResult<ValidatedTree> {
    let mut diagnostics = Diagnostics::new();

    debug!(subject, stage = %Stage::Sanitize, raw_len = raw.len(), "entering stage");
    let text = sanitize_response(raw);

    debug!(subject, stage = %Stage::TruncationCheck, "entering stage");
    if let Some(reason) = detect_truncation(&text) {
        return Err(AnalysisError::TruncatedResponse {
            reason,
            length: text.len(),
        });
    }

    debug!(subject, stage = %Stage::Decode, "entering stage");
    let doc = decode(&text)?;

    debug!(subject, stage = %Stage::StructureCheck, "entering stage");
    let response = validate_structure(doc)?;

    debug!(subject, stage = %Stage::TreeBuild, clauses = response.clauses.len(), "entering stage");
    let drafts = build_clauses(response.clauses, &mut diagnostics);

    debug!(subject, stage = %Stage::CoverageCheck, tokens = tokens.len(), "entering stage");
    let coverage = validate_coverage(
        drafts,
        tokens,
        config.prune_duplicate_claims,
        &mut diagnostics,
    )?;

    debug!(subject, stage = %Stage::ReferenceCheck, policy = %config.reference_policy, "entering stage");
    check_references(
        &coverage.clauses,
        &response.root_clause_id,
        config.reference_policy,
        &mut diagnostics,
    )?;

    Ok(ValidatedTree {
        tree: ClauseTree {
            subject_reference: subject.to_string(),
            clauses: coverage.clauses,
            root_id: response.root_clause_id,
            summary: response.structure_description,
        },
        diagnostics,
        owners: coverage.owners,
    })
}

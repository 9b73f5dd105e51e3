//! Free-form clause type strings -> canonical [`ClauseKind`].
//!
//! Resolution is total: an unrecognized string degrades to
//! [`ClauseKind::Relative`] with a diagnostic instead of failing the analysis.

use crate::diagnostic::{codes, Diagnostic, Diagnostics};
use crate::model::ClauseKind;
use serde::Serialize;
use serde_json::json;

/// Prefixes generators commonly prepend to an otherwise known alias.
const STRIPPABLE_PREFIXES: [&str; 2] = ["SUBORDINATE_", "CLAUSE_"];

/// Minimum similarity for the "closest alias" hint on fallback.
const HINT_THRESHOLD: f64 = 0.6;

const ALIASES: &[(&str, ClauseKind)] = &[
    ("MAIN", ClauseKind::Main),
    ("INDEPENDENT", ClauseKind::Main),
    ("PRINCIPAL", ClauseKind::Main),
    ("MATRIX", ClauseKind::Main),
    ("SUBORDINATE_PURPOSE", ClauseKind::SubordinatePurpose),
    ("PURPOSE", ClauseKind::SubordinatePurpose),
    ("FINAL", ClauseKind::SubordinatePurpose),
    ("SUBORDINATE_RESULT", ClauseKind::SubordinateResult),
    ("RESULT", ClauseKind::SubordinateResult),
    ("CONSECUTIVE", ClauseKind::SubordinateResult),
    ("SUBORDINATE_CAUSAL", ClauseKind::SubordinateCausal),
    ("CAUSAL", ClauseKind::SubordinateCausal),
    ("REASON", ClauseKind::SubordinateCausal),
    ("CAUSE", ClauseKind::SubordinateCausal),
    ("SUBORDINATE_CONDITIONAL", ClauseKind::SubordinateConditional),
    ("CONDITIONAL", ClauseKind::SubordinateConditional),
    ("CONDITION", ClauseKind::SubordinateConditional),
    ("PROTASIS", ClauseKind::SubordinateConditional),
    ("SUBORDINATE_TEMPORAL", ClauseKind::SubordinateTemporal),
    ("TEMPORAL", ClauseKind::SubordinateTemporal),
    ("TIME", ClauseKind::SubordinateTemporal),
    (
        "SUBORDINATE_INDIRECT_QUESTION",
        ClauseKind::SubordinateIndirectQuestion,
    ),
    ("INDIRECT_QUESTION", ClauseKind::SubordinateIndirectQuestion),
    ("QUESTION", ClauseKind::SubordinateIndirectQuestion),
    ("INTERROGATIVE", ClauseKind::SubordinateIndirectQuestion),
    ("PARTICIPIAL", ClauseKind::Participial),
    ("PARTICIPLE", ClauseKind::Participial),
    ("INFINITIVAL", ClauseKind::Infinitival),
    ("INFINITIVE", ClauseKind::Infinitival),
    ("RELATIVE", ClauseKind::Relative),
    ("RELATIVE_CLAUSE", ClauseKind::Relative),
];

/// How a type string was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPath {
    Exact,
    Prefix,
    Fallback,
}

impl MatchPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPath::Exact => "exact",
            MatchPath::Prefix => "prefix",
            MatchPath::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindResolution {
    pub kind: ClauseKind,
    pub path: MatchPath,
    /// Closest alias by similarity, only computed on fallback.
    pub hint: Option<&'static str>,
}

fn lookup(alias: &str) -> Option<ClauseKind> {
    ALIASES
        .iter()
        .find(|(name, _)| *name == alias)
        .map(|(_, kind)| *kind)
}

fn closest_alias(needle: &str) -> Option<&'static str> {
    let mut best: Option<(&'static str, f64)> = None;
    for &(alias, _) in ALIASES {
        let sim = strsim::normalized_levenshtein(needle, alias);
        if sim >= HINT_THRESHOLD && best.map_or(true, |(_, b)| sim > b) {
            best = Some((alias, sim));
        }
    }
    best.map(|(alias, _)| alias)
}

/// Resolve without recording diagnostics.
pub fn classify(raw: &str) -> KindResolution {
    let normalized = raw.trim().to_uppercase();

    if let Some(kind) = lookup(&normalized) {
        return KindResolution {
            kind,
            path: MatchPath::Exact,
            hint: None,
        };
    }

    let stripped = STRIPPABLE_PREFIXES
        .iter()
        .find_map(|prefix| normalized.strip_prefix(*prefix));
    if let Some(kind) = stripped.and_then(lookup) {
        return KindResolution {
            kind,
            path: MatchPath::Prefix,
            hint: None,
        };
    }

    KindResolution {
        kind: ClauseKind::Relative,
        path: MatchPath::Fallback,
        hint: closest_alias(stripped.unwrap_or(normalized.as_str())),
    }
}

/// Resolve a free-form type string, recording a diagnostic for anything
/// other than an exact alias hit.
pub fn resolve_clause_type(raw: &str, clause_id: &str, diags: &mut Diagnostics) -> ClauseKind {
    let resolution = classify(raw);
    match resolution.path {
        MatchPath::Exact => {}
        MatchPath::Prefix => diags.push(
            Diagnostic::new(
                codes::W_KIND_PREFIX_MATCH,
                format!(
                    "clause `{}`: type \"{}\" matched {} after stripping a prefix",
                    clause_id, raw, resolution.kind
                ),
            )
            .with_source("kind")
            .with_context(json!({
                "clause_id": clause_id,
                "input": raw,
                "resolved": resolution.kind,
            })),
        ),
        MatchPath::Fallback => diags.push(
            Diagnostic::new(
                codes::W_KIND_FALLBACK,
                format!(
                    "clause `{}`: unrecognized type \"{}\", using {}",
                    clause_id,
                    raw,
                    ClauseKind::Relative
                ),
            )
            .with_source("kind")
            .with_context(json!({
                "clause_id": clause_id,
                "input": raw,
                "resolved": ClauseKind::Relative,
                "closest_alias": resolution.hint,
            })),
        ),
    }
    resolution.kind
}

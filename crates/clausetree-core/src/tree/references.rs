//! Parent/root referential integrity.
//!
//! Generators routinely emit a `rootClauseId` or `parentClauseId` that names
//! no clause, and occasionally a parent chain that loops. Depending on
//! [`ReferencePolicy`] these are ignored, reported, or fatal.

use std::collections::{HashMap, HashSet};

use serde_json::json;

use crate::config::ReferencePolicy;
use crate::diagnostic::{codes, Diagnostic, Diagnostics};
use crate::error::{AnalysisError, AnalysisResult};
use crate::model::Clause;

/// One integrity problem found in the parent graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceIssue {
    MissingRoot { root_id: String },
    DanglingParent { clause_id: String, parent_id: String },
    DuplicateId { clause_id: String },
    Cycle { members: Vec<String> },
}

impl ReferenceIssue {
    fn into_error(self) -> AnalysisError {
        match self {
            Self::MissingRoot { root_id } => AnalysisError::Reference {
                clause_id: root_id.clone(),
                reference: root_id,
                reason: "root clause id does not name any clause".to_string(),
            },
            Self::DanglingParent {
                clause_id,
                parent_id,
            } => AnalysisError::Reference {
                clause_id,
                reference: parent_id,
                reason: "parent clause id does not name any clause".to_string(),
            },
            Self::DuplicateId { clause_id } => AnalysisError::Reference {
                reference: clause_id.clone(),
                clause_id,
                reason: "clause id is used more than once".to_string(),
            },
            Self::Cycle { members } => AnalysisError::Reference {
                clause_id: members.first().cloned().unwrap_or_default(),
                reference: members.last().cloned().unwrap_or_default(),
                reason: format!("parent chain forms a cycle: {}", members.join(" -> ")),
            },
        }
    }

    fn into_diagnostic(self) -> Diagnostic {
        match self {
            Self::MissingRoot { root_id } => Diagnostic::new(
                codes::W_MISSING_ROOT,
                format!("root clause `{}` is not among the clauses", root_id),
            )
            .with_context(json!({ "root_id": root_id })),
            Self::DanglingParent {
                clause_id,
                parent_id,
            } => Diagnostic::new(
                codes::W_DANGLING_PARENT,
                format!(
                    "clause `{}` names parent `{}`, which does not exist",
                    clause_id, parent_id
                ),
            )
            .with_context(json!({ "clause_id": clause_id, "parent_id": parent_id })),
            Self::DuplicateId { clause_id } => Diagnostic::new(
                codes::W_DUPLICATE_CLAUSE_ID,
                format!("clause id `{}` appears more than once", clause_id),
            )
            .with_context(json!({ "clause_id": clause_id })),
            Self::Cycle { members } => Diagnostic::new(
                codes::W_PARENT_CYCLE,
                format!("parent chain forms a cycle: {}", members.join(" -> ")),
            )
            .with_context(json!({ "members": members })),
        }
        .with_source("references")
    }
}

/// Collect every integrity issue, in a deterministic order.
pub fn find_reference_issues(clauses: &[Clause], root_id: &str) -> Vec<ReferenceIssue> {
    let mut issues = Vec::new();
    let mut parents: HashMap<&str, Option<&str>> = HashMap::with_capacity(clauses.len());

    for clause in clauses {
        if parents
            .insert(clause.id.as_str(), clause.parent_id.as_deref())
            .is_some()
        {
            issues.push(ReferenceIssue::DuplicateId {
                clause_id: clause.id.clone(),
            });
        }
    }

    if !parents.contains_key(root_id) {
        issues.push(ReferenceIssue::MissingRoot {
            root_id: root_id.to_string(),
        });
    }

    for clause in clauses {
        if let Some(parent) = clause.parent_id.as_deref() {
            if !parents.contains_key(parent) {
                issues.push(ReferenceIssue::DanglingParent {
                    clause_id: clause.id.clone(),
                    parent_id: parent.to_string(),
                });
            }
        }
    }

    // Walk each parent chain once; `done` holds ids already known to end
    // outside a cycle or already reported.
    let mut done: HashSet<&str> = HashSet::new();
    for clause in clauses {
        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut cursor = Some(clause.id.as_str());

        while let Some(id) = cursor {
            if done.contains(id) {
                break;
            }
            if !on_path.insert(id) {
                let start = path.iter().position(|p| *p == id).unwrap_or(0);
                let mut members: Vec<String> =
                    path[start..].iter().map(|s| s.to_string()).collect();
                members.push(id.to_string());
                issues.push(ReferenceIssue::Cycle { members });
                break;
            }
            path.push(id);
            cursor = parents.get(id).copied().flatten();
        }
        done.extend(path);
    }

    issues
}

/// Apply `policy` to the issues found in `clauses`.
pub fn check_references(
    clauses: &[Clause],
    root_id: &str,
    policy: ReferencePolicy,
    diags: &mut Diagnostics,
) -> AnalysisResult<()> {
    if policy == ReferencePolicy::Permissive {
        return Ok(());
    }
    let issues = find_reference_issues(clauses, root_id);
    match policy {
        ReferencePolicy::Strict => match issues.into_iter().next() {
            Some(issue) => Err(issue.into_error()),
            None => Ok(()),
        },
        _ => {
            for issue in issues {
                diags.push(issue.into_diagnostic());
            }
            Ok(())
        }
    }
}

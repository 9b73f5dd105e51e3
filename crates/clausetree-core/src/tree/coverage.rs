//! Token ownership: every index in `0..N` owned by exactly one clause.
//!
//! Clauses are walked in response order. The first clause to declare an
//! index owns it; later claims are reported and never reassigned.

use serde_json::json;

use crate::diagnostic::{codes, Diagnostic, Diagnostics};
use crate::error::{AnalysisError, AnalysisResult, MissingToken};
use crate::model::{Clause, Token};

use super::builder::DraftClause;

/// Clauses with verified token claims, plus the effective owner of each token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    pub clauses: Vec<Clause>,
    /// `owners[i]` is the id of the clause owning token `i`.
    pub owners: Vec<String>,
}

impl Coverage {
    pub fn owner_of(&self, index: usize) -> Option<&str> {
        self.owners.get(index).map(String::as_str)
    }
}

/// Check every declared index against `tokens`.
///
/// With `prune_duplicates`, an index lost to an earlier clause is also removed
/// from the later clause's `token_indices`, so each clause's list matches its
/// effective ownership. Without it, the declared list is kept verbatim.
pub fn validate_coverage(
    drafts: Vec<DraftClause>,
    tokens: &[Token],
    prune_duplicates: bool,
    diags: &mut Diagnostics,
) -> AnalysisResult<Coverage> {
    let n = tokens.len();
    let mut owners: Vec<Option<usize>> = vec![None; n];
    let mut clauses = Vec::with_capacity(drafts.len());

    for (pos, draft) in drafts.into_iter().enumerate() {
        let mut token_indices = Vec::with_capacity(draft.declared_indices.len());

        for &declared in &draft.declared_indices {
            let index = match usize::try_from(declared) {
                Ok(i) if i < n => i,
                _ => {
                    return Err(AnalysisError::IndexOutOfRange {
                        clause_id: draft.id.clone(),
                        index: declared,
                        token_count: n,
                    })
                }
            };

            let current = owners[index];
            match current {
                None => {
                    owners[index] = Some(pos);
                    token_indices.push(index);
                }
                Some(first) if first == pos => {
                    if !prune_duplicates {
                        token_indices.push(index);
                    }
                }
                Some(first) => {
                    let owner: &Clause = &clauses[first];
                    diags.push(
                        Diagnostic::new(
                            codes::W_DUPLICATE_CLAIM,
                            format!(
                                "token {} (\"{}\") claimed by `{}` is already owned by `{}`; keeping `{}`",
                                index, tokens[index].text, draft.id, owner.id, owner.id
                            ),
                        )
                        .with_source("coverage")
                        .with_context(json!({
                            "index": index,
                            "token": tokens[index].text,
                            "owner": owner.id,
                            "duplicate": draft.id,
                            "pruned": prune_duplicates,
                        })),
                    );
                    if !prune_duplicates {
                        token_indices.push(index);
                    }
                }
            }
        }

        let main_token_index = match draft.main_index {
            Some(m) => match usize::try_from(m) {
                Ok(i) if i < n => Some(i),
                _ => {
                    diags.push(
                        Diagnostic::new(
                            codes::W_MAIN_INDEX_DROPPED,
                            format!(
                                "clause `{}`: main token index {} is outside 0..{}; dropped",
                                draft.id, m, n
                            ),
                        )
                        .with_source("coverage")
                        .with_context(json!({ "clause_id": draft.id, "index": m })),
                    );
                    None
                }
            },
            None => None,
        };

        clauses.push(Clause {
            id: draft.id,
            kind: draft.kind,
            token_indices,
            main_token_index,
            parent_id: draft.parent_id,
            child_ids: draft.child_ids,
            connective: draft.connective,
            text: draft.text,
            role_description: draft.role_description,
        });
    }

    let missing: Vec<MissingToken> = owners
        .iter()
        .enumerate()
        .filter(|(_, owner)| owner.is_none())
        .map(|(index, _)| MissingToken {
            index,
            text: tokens[index].text.clone(),
        })
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::IncompleteCoverage { missing });
    }

    let owners = owners
        .into_iter()
        .flatten()
        .map(|pos| clauses[pos].id.clone())
        .collect();

    Ok(Coverage { clauses, owners })
}

//! Raw clause records -> draft clauses with resolved kinds and child links.

use std::collections::HashMap;

use crate::diagnostic::Diagnostics;
use crate::kind::resolve_clause_type;
use crate::model::ClauseKind;
use crate::response::RawClause;

/// A clause whose kind and children are known but whose token claims have
/// not been checked against the passage yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftClause {
    pub id: String,
    pub kind: ClauseKind,
    pub declared_indices: Vec<i64>,
    pub main_index: Option<i64>,
    pub parent_id: Option<String>,
    pub child_ids: Vec<String>,
    pub connective: Option<String>,
    pub text: String,
    pub role_description: Option<String>,
}

/// Resolve clause kinds and derive `child_ids` from `parent_id` in one
/// grouping pass. Children keep response order. Parent existence is not
/// checked here.
pub fn build_clauses(raw: Vec<RawClause>, diags: &mut Diagnostics) -> Vec<DraftClause> {
    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    for record in &raw {
        if let Some(parent) = &record.parent_clause_id {
            children
                .entry(parent.clone())
                .or_default()
                .push(record.id.clone());
        }
    }

    raw.into_iter()
        .map(|record| {
            let kind = resolve_clause_type(&record.kind, &record.id, diags);
            let child_ids: Vec<String> = children
                .get(&record.id)
                .map(|ids| ids.iter().filter(|c| **c != record.id).cloned().collect())
                .unwrap_or_default();
            DraftClause {
                kind,
                child_ids,
                declared_indices: record.word_indices,
                main_index: record.main_verb_index,
                parent_id: record.parent_clause_id,
                connective: record.conjunction.filter(|c| !c.trim().is_empty()),
                text: record.greek_text,
                role_description: record.syntactic_function,
                id: record.id,
            }
        })
        .collect()
}

//! Domain types for validated clause trees.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// One indexed unit (word) of the analyzed passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub text: String,
}

impl Token {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Index a list of words as tokens `0..N-1`.
pub fn tokens_from_words<I, S>(words: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    words
        .into_iter()
        .enumerate()
        .map(|(index, text)| Token::new(index, text))
        .collect()
}

/// Split a passage on whitespace and index the words.
pub fn tokens_from_text(text: &str) -> Vec<Token> {
    tokens_from_words(text.split_whitespace())
}

/// Closed set of canonical clause kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClauseKind {
    Main,
    SubordinatePurpose,
    SubordinateResult,
    SubordinateCausal,
    SubordinateConditional,
    SubordinateTemporal,
    SubordinateIndirectQuestion,
    Participial,
    Infinitival,
    Relative,
}

impl ClauseKind {
    pub const ALL: [ClauseKind; 10] = [
        ClauseKind::Main,
        ClauseKind::SubordinatePurpose,
        ClauseKind::SubordinateResult,
        ClauseKind::SubordinateCausal,
        ClauseKind::SubordinateConditional,
        ClauseKind::SubordinateTemporal,
        ClauseKind::SubordinateIndirectQuestion,
        ClauseKind::Participial,
        ClauseKind::Infinitival,
        ClauseKind::Relative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseKind::Main => "MAIN",
            ClauseKind::SubordinatePurpose => "SUBORDINATE_PURPOSE",
            ClauseKind::SubordinateResult => "SUBORDINATE_RESULT",
            ClauseKind::SubordinateCausal => "SUBORDINATE_CAUSAL",
            ClauseKind::SubordinateConditional => "SUBORDINATE_CONDITIONAL",
            ClauseKind::SubordinateTemporal => "SUBORDINATE_TEMPORAL",
            ClauseKind::SubordinateIndirectQuestion => "SUBORDINATE_INDIRECT_QUESTION",
            ClauseKind::Participial => "PARTICIPIAL",
            ClauseKind::Infinitival => "INFINITIVAL",
            ClauseKind::Relative => "RELATIVE",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clause {
    pub id: String,
    pub kind: ClauseKind,
    pub token_indices: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_token_index: Option<usize>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub child_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connective: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_description: Option<String>,
}

/// Aggregate result of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseTree {
    pub subject_reference: String,
    pub clauses: Vec<Clause>,
    pub root_id: String,
    pub summary: String,
}

impl ClauseTree {
    pub fn clause(&self, id: &str) -> Option<&Clause> {
        self.clauses.iter().find(|c| c.id == id)
    }

    pub fn root(&self) -> Option<&Clause> {
        self.clause(&self.root_id)
    }

    /// Children of `id`, in the order they appear in the tree.
    pub fn children(&self, id: &str) -> Vec<&Clause> {
        match self.clause(id) {
            Some(parent) => parent
                .child_ids
                .iter()
                .filter_map(|child| self.clause(child))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Effective owner of a token: the first clause, in tree order, that declares it.
    pub fn owner_of(&self, index: usize) -> Option<&Clause> {
        self.clauses
            .iter()
            .find(|c| c.token_indices.contains(&index))
    }

    /// Token index -> owning clause id, using the first-occurrence rule.
    pub fn effective_indices(&self) -> BTreeMap<usize, &str> {
        let mut owners = BTreeMap::new();
        for clause in &self.clauses {
            for &index in &clause.token_indices {
                owners.entry(index).or_insert(clause.id.as_str());
            }
        }
        owners
    }

    /// Pre-order walk from the root. Clauses unreachable from the root are
    /// not visited; each clause is visited at most once even if the parent
    /// links contain a cycle.
    pub fn depth_first(&self) -> Vec<(usize, &Clause)> {
        let by_id: HashMap<&str, &Clause> =
            self.clauses.iter().map(|c| (c.id.as_str(), c)).collect();
        let mut out = Vec::with_capacity(self.clauses.len());
        let mut seen = HashSet::new();
        let mut stack = Vec::new();
        if let Some(root) = by_id.get(self.root_id.as_str()) {
            stack.push((0usize, *root));
        }
        while let Some((depth, clause)) = stack.pop() {
            if !seen.insert(clause.id.as_str()) {
                continue;
            }
            out.push((depth, clause));
            for child in clause.child_ids.iter().rev() {
                if let Some(next) = by_id.get(child.as_str()) {
                    stack.push((depth + 1, *next));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(id: &str, parent: Option<&str>, children: &[&str], indices: &[usize]) -> Clause {
        Clause {
            id: id.to_string(),
            kind: ClauseKind::Main,
            token_indices: indices.to_vec(),
            main_token_index: None,
            parent_id: parent.map(String::from),
            child_ids: children.iter().map(|c| c.to_string()).collect(),
            connective: None,
            text: String::new(),
            role_description: None,
        }
    }

    fn sample_tree() -> ClauseTree {
        ClauseTree {
            subject_reference: "John 3:16".to_string(),
            clauses: vec![
                clause("c1", None, &["c2", "c3"], &[0, 1]),
                clause("c2", Some("c1"), &["c4"], &[2]),
                clause("c3", Some("c1"), &[], &[3]),
                clause("c4", Some("c2"), &[], &[4, 1]),
            ],
            root_id: "c1".to_string(),
            summary: "sample".to_string(),
        }
    }

    #[test]
    fn kind_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&ClauseKind::SubordinateIndirectQuestion).unwrap();
        assert_eq!(json, "\"SUBORDINATE_INDIRECT_QUESTION\"");
        for kind in ClauseKind::ALL {
            let round: ClauseKind =
                serde_json::from_str(&format!("\"{}\"", kind.as_str())).unwrap();
            assert_eq!(round, kind);
        }
    }

    #[test]
    fn tokens_from_text_indexes_words() {
        let tokens = tokens_from_text("  In the  beginning ");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2], Token::new(2, "beginning"));
    }

    #[test]
    fn depth_first_visits_in_preorder_with_depth() {
        let tree = sample_tree();
        let order: Vec<(usize, &str)> = tree
            .depth_first()
            .into_iter()
            .map(|(d, c)| (d, c.id.as_str()))
            .collect();
        assert_eq!(order, vec![(0, "c1"), (1, "c2"), (2, "c4"), (1, "c3")]);
    }

    #[test]
    fn owner_of_uses_first_occurrence() {
        let tree = sample_tree();
        assert_eq!(tree.owner_of(1).map(|c| c.id.as_str()), Some("c1"));
        assert_eq!(tree.owner_of(4).map(|c| c.id.as_str()), Some("c4"));
        assert!(tree.owner_of(9).is_none());
        assert_eq!(tree.effective_indices().get(&1), Some(&"c1"));
    }

    #[test]
    fn children_follow_child_ids() {
        let tree = sample_tree();
        let ids: Vec<&str> = tree.children("c1").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c3"]);
        assert!(tree.children("missing").is_empty());
    }

    #[test]
    fn tree_uses_camel_case_field_names() {
        let value = serde_json::to_value(sample_tree()).unwrap();
        assert!(value.get("subjectReference").is_some());
        assert!(value["clauses"][0].get("tokenIndices").is_some());
        assert!(value["clauses"][0].get("childIds").is_some());
    }
}

//! Decoding and shallow structure checks for the raw response document.

use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const FIELD_CLAUSES: &str = "clauses";
const FIELD_ROOT: &str = "rootClauseId";
const FIELD_DESCRIPTION: &str = "structureDescription";

/// One clause record as the generator emitted it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClause {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub kind: String,
    #[serde(default)]
    pub word_indices: Vec<i64>,
    #[serde(default)]
    pub main_verb_index: Option<i64>,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub parent_clause_id: Option<String>,
    #[serde(default)]
    pub conjunction: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub greek_text: String,
    #[serde(default)]
    pub syntactic_function: Option<String>,
}

/// The decoded response after the top-level checks passed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub clauses: Vec<RawClause>,
    pub root_clause_id: String,
    pub structure_description: String,
}

/// Decode sanitized text as JSON.
pub fn decode(text: &str) -> AnalysisResult<Value> {
    serde_json::from_str(text).map_err(|e| AnalysisError::parse(&e))
}

/// Check the required top-level fields and deserialize the clause records.
pub fn validate_structure(doc: Value) -> AnalysisResult<RawResponse> {
    let Value::Object(mut obj) = doc else {
        return Err(AnalysisError::structure(
            "<root>",
            "must be a JSON object",
        ));
    };

    let clauses = match obj.remove(FIELD_CLAUSES) {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(AnalysisError::structure(FIELD_CLAUSES, "must be an array")),
        None => return Err(AnalysisError::structure(FIELD_CLAUSES, "is missing")),
    };
    let root_clause_id = required_text(obj.get(FIELD_ROOT), FIELD_ROOT)?;
    let structure_description = required_text(obj.get(FIELD_DESCRIPTION), FIELD_DESCRIPTION)?;

    let clauses = clauses
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            RawClause::deserialize(item)
                .map_err(|e| AnalysisError::structure(format!("clauses[{}]", i), e.to_string()))
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    Ok(RawResponse {
        clauses,
        root_clause_id,
        structure_description,
    })
}

fn required_text(value: Option<&Value>, field: &str) -> AnalysisResult<String> {
    let text = match value {
        None | Some(Value::Null) => return Err(AnalysisError::structure(field, "is missing")),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err(AnalysisError::structure(field, "must be a string")),
    };
    if text.is_empty() {
        return Err(AnalysisError::structure(field, "is empty"));
    }
    Ok(text)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<IdRepr> for String {
    fn from(repr: IdRepr) -> Self {
        match repr {
            IdRepr::Text(s) => s,
            IdRepr::Int(n) => n.to_string(),
            IdRepr::Float(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    IdRepr::deserialize(deserializer).map(String::from)
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<IdRepr>::deserialize(deserializer)?;
    Ok(repr.map(String::from).filter(|s| !s.trim().is_empty()))
}

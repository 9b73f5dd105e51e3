//! End-to-end validation scenarios over the public pipeline.

use clausetree_core::{
    codes, resolve_clause_type, tokens_from_words, validate_response, AnalysisError, ClauseKind,
    Diagnostics, EngineConfig, Token,
};

fn five_tokens() -> Vec<Token> {
    tokens_from_words(["Ἐν", "ἀρχῇ", "ἦν", "ὁ", "λόγος"])
}

fn two_clause_response(second: &str) -> String {
    format!(
        r#"{{
  "clauses": [
    {{"id": "clause_1", "type": "MAIN", "wordIndices": [0, 1, 2], "parentClauseId": null, "greekText": "Ἐν ἀρχῇ ἦν"}},
    {{"id": "clause_2", "type": "SUBORDINATE_PURPOSE", "wordIndices": {second}, "parentClauseId": "clause_1", "greekText": "ὁ λόγος"}}
  ],
  "rootClauseId": "clause_1",
  "structureDescription": "A main clause governing a purpose clause."
}}"#
    )
}

#[test]
fn partition_with_child_links() {
    let out = validate_response(
        &two_clause_response("[3, 4]"),
        &five_tokens(),
        "John 1:1",
        &EngineConfig::default(),
    )
    .unwrap();

    let clause_1 = out.tree.clause("clause_1").unwrap();
    assert_eq!(clause_1.child_ids, vec!["clause_2".to_string()]);

    let owned: usize = out.tree.clauses.iter().map(|c| c.token_indices.len()).sum();
    assert_eq!(owned, 5);
    assert_eq!(out.tree.effective_indices().len(), 5);
}

#[test]
fn duplicate_claim_keeps_first_owner() {
    let out = validate_response(
        &two_clause_response("[1, 4]"),
        &tokens_from_words(["Ἐν", "ἀρχῇ", "ἦν", "ὁ", "λόγος"]),
        "John 1:1",
        &EngineConfig::default(),
    );
    // Index 3 is now unclaimed, so this is a coverage failure, not a success.
    assert!(matches!(out, Err(AnalysisError::IncompleteCoverage { .. })));

    let out = validate_response(
        &two_clause_response("[1, 3, 4]"),
        &five_tokens(),
        "John 1:1",
        &EngineConfig::default(),
    )
    .unwrap();
    assert!(out.diagnostics.has_code(codes::W_DUPLICATE_CLAIM));
    assert_eq!(out.tree.owner_of(1).unwrap().id, "clause_1");
    assert_eq!(out.owners[1], "clause_1");
}

#[test]
fn duplicate_claim_with_third_clause_filling_gap() {
    // clause_2 re-claims index 1; index 3 belongs to a nested relative clause.
    let raw = r#"{
  "clauses": [
    {"id": "clause_1", "type": "MAIN", "wordIndices": [0, 1, 2]},
    {"id": "clause_2", "type": "SUBORDINATE_PURPOSE", "wordIndices": [1, 4], "parentClauseId": "clause_1"},
    {"id": "clause_3", "type": "RELATIVE", "wordIndices": [3], "parentClauseId": "clause_2"}
  ],
  "rootClauseId": "clause_1",
  "structureDescription": "Nested."
}"#;
    let out = validate_response(raw, &five_tokens(), "John 1:1", &EngineConfig::default()).unwrap();
    let dup = out.diagnostics.with_code(codes::W_DUPLICATE_CLAIM).next().unwrap();
    assert!(dup.message.contains("clause_1"));
    assert!(dup.message.contains("clause_2"));
    assert_eq!(out.owners[1], "clause_1");
    assert_eq!(out.tree.clause("clause_2").unwrap().token_indices, vec![4]);
}

#[test]
fn trailing_comma_is_truncation() {
    let raw = "{\n  \"clauses\": [],\n  \"rootClauseId\": \"clause_1\",";
    let err = validate_response(raw, &five_tokens(), "x", &EngineConfig::default()).unwrap_err();
    assert_eq!(err.code(), "E_TRUNCATED");
    assert!(err.is_user_actionable());
}

#[test]
fn final_is_an_exact_alias() {
    let mut diags = Diagnostics::new();
    assert_eq!(
        resolve_clause_type("Final", "c1", &mut diags),
        ClauseKind::SubordinatePurpose
    );
    assert!(diags.is_empty());
}

#[test]
fn unknown_subordinate_kind_falls_back_to_relative() {
    let mut diags = Diagnostics::new();
    assert_eq!(
        resolve_clause_type("SUBORDINATE_WEIRDKIND", "c1", &mut diags),
        ClauseKind::Relative
    );
    assert!(diags.has_code(codes::W_KIND_FALLBACK));
}

#[test]
fn index_ten_of_five_is_out_of_range() {
    let err = validate_response(
        &two_clause_response("[3, 4, 10]"),
        &five_tokens(),
        "x",
        &EngineConfig::default(),
    )
    .unwrap_err();
    match &err {
        AnalysisError::IndexOutOfRange {
            clause_id,
            index,
            token_count,
        } => {
            assert_eq!(clause_id, "clause_2");
            assert_eq!(*index, 10);
            assert_eq!(*token_count, 5);
        }
        other => panic!("expected out-of-range, got {other:?}"),
    }
    assert!(err.to_string().contains("0-4"));
}

#[test]
fn missing_structure_description_is_a_structure_error() {
    let raw = r#"{"clauses": [], "rootClauseId": "c1"}"#;
    let err = validate_response(raw, &[], "x", &EngineConfig::default()).unwrap_err();
    match err {
        AnalysisError::Structure { field, .. } => assert_eq!(field, "structureDescription"),
        other => panic!("expected structure error, got {other:?}"),
    }
}

#[test]
fn garbage_is_a_parse_error() {
    let err = validate_response("not json at all", &[], "x", &EngineConfig::default()).unwrap_err();
    assert_eq!(err.code(), "E_PARSE");
}

#[test]
fn undefined_values_are_tolerated() {
    let raw = r#"{"clauses": [{"id": "c1", "type": "MAIN", "wordIndices": [0], "mainVerbIndex": undefined, "conjunction": undefined}],
        "rootClauseId": "c1", "structureDescription": "ok"}"#;
    let out = validate_response(raw, &tokens_from_words(["ἦν"]), "x", &EngineConfig::default())
        .unwrap();
    assert_eq!(out.tree.clauses[0].main_token_index, None);
}

#[test]
fn numeric_ids_are_accepted() {
    let raw = r#"{"clauses": [
        {"id": 1, "type": "MAIN", "wordIndices": [0]},
        {"id": 2, "type": "RELATIVE", "wordIndices": [1], "parentClauseId": 1}
    ], "rootClauseId": 1, "structureDescription": "ok"}"#;
    let out = validate_response(raw, &tokens_from_words(["a", "b"]), "x", &EngineConfig::default())
        .unwrap();
    assert_eq!(out.tree.root_id, "1");
    assert_eq!(out.tree.children("1")[0].id, "2");
    assert!(out.diagnostics.is_empty());
}

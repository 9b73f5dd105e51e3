//! Rendering of trees, diagnostics and failures.

use clausetree_core::{AnalysisError, ClauseTree, Diagnostics};
use serde_json::json;

use crate::cli::args::OutputFormat;

/// Print a tree. `extra` fields are merged into the JSON document.
pub fn print_tree(
    tree: &ClauseTree,
    diagnostics: &Diagnostics,
    extra: serde_json::Value,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let mut doc = json!({
                "status": "ok",
                "tree": tree,
                "diagnostics": diagnostics,
            });
            if let (Some(obj), Some(extra)) = (doc.as_object_mut(), extra.as_object()) {
                for (k, v) in extra {
                    obj.insert(k.clone(), v.clone());
                }
            }
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Text => {
            println!("{} ({})", tree.subject_reference, tree.summary);
            for (depth, clause) in tree.depth_first() {
                let connective = clause
                    .connective
                    .as_deref()
                    .map(|c| format!(" [{}]", c))
                    .unwrap_or_default();
                println!(
                    "{}{} {}{} {:?}",
                    "  ".repeat(depth),
                    clause.id,
                    clause.kind,
                    connective,
                    clause.token_indices
                );
            }
            for diag in diagnostics {
                eprint!("{}", diag.format_terminal());
            }
        }
    }
    Ok(())
}

pub fn print_failure(err: &AnalysisError, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let doc = json!({
                "status": "error",
                "code": err.code(),
                "message": err.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Text => {
            eprintln!("error: [{}] {}", err.code(), err);
        }
    }
    Ok(())
}

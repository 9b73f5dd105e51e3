use clausetree_core::classify;
use serde_json::json;

use crate::cli::args::{KindArgs, OutputFormat};
use crate::exit_codes;

pub fn run(args: KindArgs) -> anyhow::Result<i32> {
    let rows: Vec<_> = args
        .types
        .iter()
        .map(|raw| (raw, classify(raw)))
        .collect();

    match args.format {
        OutputFormat::Json => {
            let doc: Vec<_> = rows
                .iter()
                .map(|(raw, res)| {
                    json!({
                        "input": raw,
                        "kind": res.kind,
                        "path": res.path,
                        "hint": res.hint,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Text => {
            for (raw, res) in &rows {
                let mut line = format!("{} -> {} ({})", raw, res.kind, res.path.as_str());
                if let Some(hint) = res.hint {
                    line.push_str(&format!(", closest alias {}", hint));
                }
                println!("{}", line);
            }
        }
    }
    Ok(exit_codes::SUCCESS)
}

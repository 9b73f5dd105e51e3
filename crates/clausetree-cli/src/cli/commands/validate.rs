use clausetree_core::validate_response;
use serde_json::json;
use tracing::debug;

use super::input::{load_engine_config, load_tokens, read_file};
use super::output::{print_failure, print_tree};
use crate::cli::args::ValidateArgs;
use crate::exit_codes;

pub fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let (config, tokens, raw) = match load_inputs(&args) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    debug!(tokens = tokens.len(), policy = %config.reference_policy, "validating saved response");

    match validate_response(&raw, &tokens, &args.subject, &config) {
        Ok(validated) => {
            print_tree(
                &validated.tree,
                &validated.diagnostics,
                json!({ "owners": validated.owners }),
                args.engine.format,
            )?;
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            print_failure(&e, args.engine.format)?;
            Ok(e.exit_code())
        }
    }
}

fn load_inputs(
    args: &ValidateArgs,
) -> anyhow::Result<(clausetree_core::EngineConfig, Vec<clausetree_core::Token>, String)> {
    let config = load_engine_config(&args.engine)?;
    let tokens = load_tokens(&args.source)?;
    let raw = read_file(&args.response, "response")?;
    Ok((config, tokens, raw))
}

//! Loading of tokens and engine configuration from command-line inputs.

use std::path::Path;

use anyhow::Context;
use clausetree_core::{load_config, tokens_from_text, EngineConfig, ReferencePolicy, Token};
use serde::Deserialize;

use crate::cli::args::{EngineArgs, ReferencePolicyArg, TokenSource};

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenFile {
    Words(Vec<String>),
    Tokens(Vec<Token>),
}

pub fn load_tokens(source: &TokenSource) -> anyhow::Result<Vec<Token>> {
    if let Some(text) = &source.text {
        return Ok(tokens_from_text(text));
    }
    let path = source
        .tokens
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("either --tokens or --text is required"))?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tokens file {}", path.display()))?;
    let parsed: TokenFile = serde_json::from_str(&raw).with_context(|| {
        format!(
            "tokens file {} is not a JSON word or token list",
            path.display()
        )
    })?;

    match parsed {
        TokenFile::Words(words) => Ok(clausetree_core::tokens_from_words(words)),
        TokenFile::Tokens(tokens) => {
            if let Some((pos, token)) = tokens.iter().enumerate().find(|(i, t)| t.index != *i) {
                anyhow::bail!(
                    "tokens file {}: entry {} has index {}, expected contiguous indices from 0",
                    path.display(),
                    pos,
                    token.index
                );
            }
            Ok(tokens)
        }
    }
}

pub fn load_engine_config(args: &EngineArgs) -> anyhow::Result<EngineConfig> {
    let base = match &args.config {
        Some(path) => load(path)?,
        None => EngineConfig::default(),
    };
    let mut config = base.with_env_overrides()?;

    if let Some(policy) = args.reference_policy {
        config = config.with_reference_policy(match policy {
            ReferencePolicyArg::Permissive => ReferencePolicy::Permissive,
            ReferencePolicyArg::Warn => ReferencePolicy::Warn,
            ReferencePolicyArg::Strict => ReferencePolicy::Strict,
        });
    }
    if args.keep_duplicates {
        config = config.with_pruning(false);
    }
    Ok(config)
}

fn load(path: &Path) -> anyhow::Result<EngineConfig> {
    load_config(path).with_context(|| format!("failed to load config {}", path.display()))
}

pub fn read_file(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {} {}", what, path.display()))
}

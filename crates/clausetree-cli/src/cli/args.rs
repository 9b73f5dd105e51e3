use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "clausetree",
    version,
    about = "Validate generated clause analyses into trees every token belongs to"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a saved generator response against a passage
    Validate(ValidateArgs),
    /// Show how clause type strings resolve
    Kind(KindArgs),
    /// Generate (or fetch from cache) and validate an analysis
    Analyze(AnalyzeArgs),
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferencePolicyArg {
    Permissive,
    Warn,
    Strict,
}

/// Where the passage tokens come from.
#[derive(clap::Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TokenSource {
    /// JSON file with an array of words or of {"index", "text"} objects
    #[arg(long)]
    pub tokens: Option<PathBuf>,

    /// Passage text, split on whitespace
    #[arg(long)]
    pub text: Option<String>,
}

/// Options shared by commands that run the pipeline.
#[derive(clap::Args, Debug, Clone)]
pub struct EngineArgs {
    /// YAML engine config (environment overrides still apply)
    #[arg(long, env = "CLAUSETREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the reference policy
    #[arg(long, value_enum)]
    pub reference_policy: Option<ReferencePolicyArg>,

    /// Keep duplicate claims in later clauses' token lists
    #[arg(long)]
    pub keep_duplicates: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// File holding the raw generator response
    #[arg(long)]
    pub response: PathBuf,

    #[command(flatten)]
    pub source: TokenSource,

    #[arg(long, default_value = "unknown")]
    pub subject: String,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct KindArgs {
    /// Type strings to resolve
    #[arg(required = true)]
    pub types: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Openai,
    Fake,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// File holding the fully rendered prompt
    #[arg(long)]
    pub prompt_file: PathBuf,

    #[command(flatten)]
    pub source: TokenSource,

    /// Subject reference; also the cache key
    #[arg(long)]
    pub subject: String,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long, value_enum, default_value_t = Provider::Openai, env = "CLAUSETREE_PROVIDER")]
    pub provider: Provider,

    /// Canned response for the fake provider
    #[arg(long, required_if_eq("provider", "fake"))]
    pub fake_response: Option<PathBuf>,

    /// Model identifier for the openai provider
    #[arg(long, env = "CLAUSETREE_MODEL")]
    pub model: Option<String>,

    /// File cache directory; no cache when unset
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Skip the cache lookup but still store the result
    #[arg(long)]
    pub refresh: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

//! Engine configuration: YAML file plus `CLAUSETREE_*` environment overrides.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CLAUSETREE_LANGUAGE` | Cache language key (default: `en`) |
//! | `CLAUSETREE_USE_CACHE` | Consult the cache before generating (default: `true`) |
//! | `CLAUSETREE_REFRESH` | Skip cache lookup but still write (default: `false`) |
//! | `CLAUSETREE_PRUNE_DUPLICATES` | Drop duplicate claims from later clauses (default: `true`) |
//! | `CLAUSETREE_REFERENCE_POLICY` | `permissive`, `warn` or `strict` (default: `warn`) |
//! | `CLAUSETREE_CACHE_DIR` | Directory for the file cache |
//! | `CLAUSETREE_CACHE_TTL` | File cache entry lifetime in seconds |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unsupported config version {found} (supported: {supported})")]
    Version { found: u32, supported: u32 },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// What to do about parent/root ids that do not resolve, and parent cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// No checks.
    Permissive,
    /// Record diagnostics.
    #[default]
    Warn,
    /// Fail the analysis.
    Strict,
}

impl FromStr for ReferencePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" | "off" => Ok(Self::Permissive),
            "warn" | "warning" => Ok(Self::Warn),
            "strict" => Ok(Self::Strict),
            other => Err(ConfigError::InvalidValue {
                key: "reference_policy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Permissive => "permissive",
            Self::Warn => "warn",
            Self::Strict => "strict",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_true")]
    pub use_cache: bool,

    #[serde(default)]
    pub refresh: bool,

    #[serde(default = "default_true")]
    pub prune_duplicate_claims: bool,

    #[serde(default)]
    pub reference_policy: ReferencePolicy,

    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    #[serde(default)]
    pub cache_ttl_secs: Option<i64>,
}

fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            language: default_language(),
            use_cache: true,
            refresh: false,
            prune_duplicate_claims: true,
            reference_policy: ReferencePolicy::default(),
            cache_dir: None,
            cache_ttl_secs: None,
        }
    }
}

impl EngineConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `CLAUSETREE_*` variables on top of `self`.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = std::env::var("CLAUSETREE_LANGUAGE") {
            if !v.trim().is_empty() {
                self.language = v.trim().to_string();
            }
        }
        if let Some(v) = env_bool("CLAUSETREE_USE_CACHE")? {
            self.use_cache = v;
        }
        if let Some(v) = env_bool("CLAUSETREE_REFRESH")? {
            self.refresh = v;
        }
        if let Some(v) = env_bool("CLAUSETREE_PRUNE_DUPLICATES")? {
            self.prune_duplicate_claims = v;
        }
        if let Ok(v) = std::env::var("CLAUSETREE_REFERENCE_POLICY") {
            self.reference_policy = v.parse()?;
        }
        if let Ok(v) = std::env::var("CLAUSETREE_CACHE_DIR") {
            if !v.trim().is_empty() {
                self.cache_dir = Some(PathBuf::from(v.trim()));
            }
        }
        if let Ok(v) = std::env::var("CLAUSETREE_CACHE_TTL") {
            let secs = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "CLAUSETREE_CACHE_TTL".to_string(),
                value: v.clone(),
            })?;
            self.cache_ttl_secs = Some(secs);
        }
        Ok(self)
    }

    pub fn with_reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.reference_policy = policy;
        self
    }

    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune_duplicate_claims = prune;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

fn env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(None),
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: v,
            }),
        },
    }
}

/// Load and validate a YAML config file. Environment overrides are not applied.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let cfg: EngineConfig = serde_yaml::from_str(&raw)?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError::Version {
            found: cfg.version,
            supported: SUPPORTED_CONFIG_VERSION,
        });
    }
    Ok(cfg)
}

//! YAML configuration for the spendcat pipeline.
//!
//! One file configures every stage. Every field is optional; omitted values
//! fall back to the defaults shown here.
//!
//! ```yaml
//! version: "1.0"
//! name: "household ledger"
//!
//! classifier:
//!   k: 5
//!   min_average_similarity: 0.1
//!
//! semantic:
//!   mode: "api"                 # or "stub" for offline runs
//!   api_url: "https://api.openai.com/v1/embeddings"
//!   model_name: "text-embedding-3-small"
//!   api_key_env: "OPENAI_API_KEY"
//!   timeout_secs: 30
//!   dimension: 1536
//!   normalize: false
//!
//! ingest:
//!   id_namespace: "6ba7b812-9dad-11d1-80b4-00c04fd430c8"
//!   negate_debits: true
//!
//! log_level: "info"
//! log_json: false
//! ```
//!
//! The API key itself never appears in the file: `api_key_env` names the
//! environment variable holding it.

use std::fs;
use std::path::Path;

use ingest::IngestConfig;
use matcher::ClassifierConfig;
use semantic::{DEFAULT_API_URL, DEFAULT_MODEL, SemanticConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SpendcatConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub semantic: SemanticYamlConfig,

    #[serde(default)]
    pub ingest: IngestYamlConfig,

    /// Default `tracing` filter; `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

impl SpendcatConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: SpendcatConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.classifier
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.semantic
            .to_semantic_config(None)
            .validate()
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))?;
        self.to_ingest_config()?;

        if self.log_level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "log_level must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn to_classifier_config(&self) -> ClassifierConfig {
        self.classifier
    }

    /// Semantic config with the API key read from `semantic.api_key_env`.
    pub fn to_semantic_config(&self) -> SemanticConfig {
        let key = std::env::var(&self.semantic.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        self.semantic.to_semantic_config(key)
    }

    pub fn to_ingest_config(&self) -> Result<IngestConfig, ConfigLoadError> {
        let namespace = Uuid::parse_str(self.ingest.id_namespace.trim()).map_err(|e| {
            ConfigLoadError::Validation(format!(
                "ingest.id_namespace {:?} is not a UUID: {e}",
                self.ingest.id_namespace
            ))
        })?;
        Ok(IngestConfig::default()
            .with_id_namespace(namespace)
            .with_negate_debits(self.ingest.negate_debits))
    }
}

impl Default for SpendcatConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            name: None,
            classifier: ClassifierConfig::default(),
            semantic: SemanticYamlConfig::default(),
            ingest: IngestYamlConfig::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticYamlConfig {
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Environment variable holding the bearer key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub normalize: bool,
}

impl SemanticYamlConfig {
    fn to_semantic_config(&self, api_key: Option<String>) -> SemanticConfig {
        SemanticConfig::default()
            .with_mode(self.mode.clone())
            .with_api_url(self.api_url.clone())
            .with_model_name(self.model_name.clone())
            .with_api_key(api_key)
            .with_timeout_secs(self.timeout_secs)
            .with_dimension(self.dimension)
            .with_normalize(self.normalize)
    }
}

impl Default for SemanticYamlConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            api_url: default_api_url(),
            model_name: default_model_name(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
            dimension: None,
            normalize: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestYamlConfig {
    /// UUID namespace for deterministic record ids.
    #[serde(default = "default_id_namespace")]
    pub id_namespace: String,
    #[serde(default = "true_value")]
    pub negate_debits: bool,
}

impl Default for IngestYamlConfig {
    fn default() -> Self {
        Self {
            id_namespace: default_id_namespace(),
            negate_debits: true,
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_mode() -> String {
    "api".to_string()
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_model_name() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_id_namespace() -> String {
    Uuid::NAMESPACE_OID.to_string()
}
fn true_value() -> bool {
    true
}

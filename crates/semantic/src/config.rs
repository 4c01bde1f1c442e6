use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SemanticError;

/// Default OpenAI-compatible embeddings endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/embeddings";
/// Default remote model.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
/// Dimension of [`DEFAULT_MODEL`]; also the stub's default width.
pub const DEFAULT_DIMENSION: usize = 1536;

/// Runtime configuration describing which embedding producer to use.
///
/// # Example
/// ```
/// use semantic::SemanticConfig;
///
/// let cfg = SemanticConfig::default()
///     .with_mode("stub")
///     .with_dimension(Some(64));
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// `"api"` (remote HTTP) or `"stub"` (deterministic, offline).
    pub mode: String,
    /// Model identifier sent with each request.
    pub model_name: String,
    /// Embeddings endpoint used in api mode.
    pub api_url: String,
    /// Bearer token. Never serialized; callers inject it from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Overall request timeout in seconds.
    pub timeout_secs: u64,
    /// Expected dimension. Remote vectors of another width are rejected; the
    /// stub uses it as its output width.
    pub dimension: Option<usize>,
    /// Normalize vectors to unit length.
    pub normalize: bool,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "api".into(),
            model_name: DEFAULT_MODEL.into(),
            api_url: DEFAULT_API_URL.into(),
            api_key: None,
            timeout_secs: 30,
            dimension: None,
            normalize: false,
        }
    }
}

// Manual impl keeps the key out of logs.
impl fmt::Debug for SemanticConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticConfig")
            .field("mode", &self.mode)
            .field("model_name", &self.model_name)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("dimension", &self.dimension)
            .field("normalize", &self.normalize)
            .finish()
    }
}

impl SemanticConfig {
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_dimension(mut self, dimension: Option<usize>) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Width of stub vectors.
    pub fn stub_dimension(&self) -> usize {
        self.dimension.unwrap_or(DEFAULT_DIMENSION)
    }

    pub fn validate(&self) -> Result<(), SemanticError> {
        match self.mode.as_str() {
            "api" => {
                if self.api_url.trim().is_empty() {
                    return Err(SemanticError::InvalidConfig(
                        "api_url must not be empty in api mode".into(),
                    ));
                }
                if self.model_name.trim().is_empty() {
                    return Err(SemanticError::InvalidConfig(
                        "model_name must not be empty in api mode".into(),
                    ));
                }
                if self.timeout_secs == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "timeout_secs must be greater than zero".into(),
                    ));
                }
            }
            "stub" => {}
            other => {
                return Err(SemanticError::InvalidConfig(format!(
                    "unknown mode {other:?}; expected \"api\" or \"stub\""
                )))
            }
        }
        if self.dimension == Some(0) {
            return Err(SemanticError::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

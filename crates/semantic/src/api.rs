use std::time::Duration;

use async_trait::async_trait;
use index::EmbeddingVector;
use serde_json::{json, Value};
use tracing::warn;

use crate::embedder::{finish_vector, Embedder};
use crate::{SemanticConfig, SemanticError};

/// Embedder backed by an OpenAI-compatible `/v1/embeddings` endpoint.
///
/// One request per text, no retries. Failures surface as
/// [`SemanticError::Request`] or [`SemanticError::InvalidResponse`].
#[derive(Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
    model_name: String,
    api_key: Option<String>,
    dimension: Option<usize>,
    normalize: bool,
}

impl std::fmt::Debug for HttpEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbedder")
            .field("url", &self.url)
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl HttpEmbedder {
    pub fn new(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        cfg.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .connect_timeout(Duration::from_secs(cfg.timeout_secs.min(10)))
            .build()
            .map_err(|e| SemanticError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: cfg.api_url.clone(),
            model_name: cfg.model_name.clone(),
            api_key: cfg.api_key.clone(),
            dimension: cfg.dimension,
            normalize: cfg.normalize,
        })
    }

    async fn send_api_request(&self, payload: Value) -> Result<Value, SemanticError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(key) = self.api_key.as_deref() {
            request = request.bearer_auth(key);
        }

        let response = request
            .json(&payload)
            .send()
            .await
            .map_err(|e| SemanticError::Request(format!("HTTP request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Request(format!("HTTP error {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::InvalidResponse(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, SemanticError> {
        let payload = build_api_payload(text, &self.model_name);
        let result = match self.send_api_request(payload).await {
            Ok(body) => parse_embedding_response(body)
                .and_then(|values| finish_vector(values, self.dimension, self.normalize)),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(model = %self.model_name, error = %err, "embedding_request_failure");
        }
        result
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

pub(crate) fn build_api_payload(text: &str, model: &str) -> Value {
    json!({ "input": text, "model": model })
}

/// Extract `data[0].embedding` from an embeddings response.
pub(crate) fn parse_embedding_response(value: Value) -> Result<Vec<f64>, SemanticError> {
    let Value::Object(mut map) = value else {
        return Err(SemanticError::InvalidResponse(
            "response body is not a JSON object".into(),
        ));
    };
    let Some(Value::Array(items)) = map.remove("data") else {
        return Err(SemanticError::InvalidResponse(
            "response has no `data` array".into(),
        ));
    };
    let Some(Value::Object(mut first)) = items.into_iter().next() else {
        return Err(SemanticError::InvalidResponse(
            "response `data` array is empty".into(),
        ));
    };
    let Some(embedding) = first.remove("embedding") else {
        return Err(SemanticError::InvalidResponse(
            "missing `embedding` field in data item".into(),
        ));
    };
    parse_embedding_vector(embedding)
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f64>, SemanticError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|v| {
                v.as_f64().ok_or_else(|| {
                    SemanticError::InvalidResponse("embedding contains non-numeric value".into())
                })
            })
            .collect(),
        _ => Err(SemanticError::InvalidResponse(
            "embedding is not an array".into(),
        )),
    }
}

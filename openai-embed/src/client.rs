use thiserror::Error;

use crate::models::{EmbeddingRequest, EmbeddingResponse};

/// Client for an OpenAI-compatible embeddings endpoint.
///
/// One instance is configured with a base URL (e.g. `http://localhost:8553/v1`),
/// an API key and a model name, and converts text into fixed-dimension vectors.
pub struct EmbeddingsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl EmbeddingsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Append the given path to the base URL.
    fn endpoint(&self, path: &str) -> String {
        let trimmed_url = self.base_url.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        format!("{}/{}", trimmed_url, trimmed_path)
    }

    /// Embed a batch of texts, one vector per input, in input order.
    pub async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if inputs.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest::new(self.model.clone(), inputs.to_vec());

        let resp = self
            .http
            .post(self.endpoint("/embeddings"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbedError::ResponseError(e.to_string()))?;

        if resp.status() == 401 || resp.status() == 403 {
            return Err(EmbedError::Unauthorized);
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbedError::ResponseError(format!("{}: {}", status, body)));
        }

        let resp_data = resp.json::<EmbeddingResponse>().await.map_err(|e| {
            EmbedError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })?;

        if resp_data.data.len() != inputs.len() {
            return Err(EmbedError::ParsingError(format!(
                "Expected {} embeddings, got {}",
                inputs.len(),
                resp_data.data.len()
            )));
        }

        // The endpoint is not required to preserve input order, so reorder by index.
        let mut data = resp_data.data;
        data.sort_by_key(|e| e.index);
        tracing::debug!(count = data.len(), "created embeddings");

        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    /// Embed a single text.
    pub async fn embed_one(&self, input: &str) -> Result<Vec<f32>, EmbedError> {
        let mut embeddings = self.embed(&[input.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbedError::ParsingError("Empty embeddings response".to_string()))
    }
}

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
}

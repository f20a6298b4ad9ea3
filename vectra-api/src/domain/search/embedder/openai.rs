//! Embedder backed by an OpenAI-compatible embeddings endpoint.

use async_trait::async_trait;
use openai_embed::EmbeddingsClient;

use crate::config::EmbeddingsSettings;
use crate::domain::search::traits::{Embedder, Result, SearchError};

/// Task prefix expected by nomic-style embedding models for retrieval queries.
pub const QUERY_TASK_PREFIX: &str = "search_query: ";

/// Embedder delegating to the `openai-embed` client.
///
/// Every call is one network request; there is no batching or caching here,
/// and errors propagate to the caller as [`SearchError::Embedding`].
pub struct OpenAiEmbedder {
    client: EmbeddingsClient,
    dimensions: usize,
}

impl OpenAiEmbedder {
    pub fn new(client: EmbeddingsClient, dimensions: usize) -> Self {
        Self { client, dimensions }
    }

    pub fn from_settings(settings: &EmbeddingsSettings) -> Self {
        let client = EmbeddingsClient::new(
            settings.api_base.clone(),
            settings.api_key.clone(),
            settings.model.clone(),
        );
        Self::new(client, settings.dimensions)
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = format!("{}{}", QUERY_TASK_PREFIX, text);

        let embedding = self
            .client
            .embed_one(&input)
            .await
            .map_err(|e| SearchError::Embedding(e.to_string()))?;

        if embedding.len() != self.dimensions {
            return Err(SearchError::Embedding(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

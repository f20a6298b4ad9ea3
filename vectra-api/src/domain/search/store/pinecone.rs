//! Generic vector store adapter speaking the Pinecone REST protocol.
//!
//! This is the fallback path: the backend only exposes a "nearest neighbors
//! with optional filter" capability, so the adapter embeds the query itself
//! and delegates scoring entirely to the backend. Backend failures degrade to
//! an empty match list so other backends still contribute.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use async_trait::async_trait;

use crate::domain::search::filter::SearchFilter;
use crate::domain::search::traits::{Embedder, Result, SearchError, VectorStore};
use crate::domain::search::types::{
    BackendDescriptor, BackendHealth, BackendKind, HealthState, RawMatch,
};

pub struct PineconeStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    descriptor: BackendDescriptor,
    embedder: Arc<dyn Embedder>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStats {
    #[serde(default)]
    total_vector_count: Option<i64>,
    #[serde(default)]
    namespaces: std::collections::HashMap<String, NamespaceStats>,
    #[serde(default)]
    dimension: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceStats {
    #[serde(default)]
    vector_count: i64,
}

impl PineconeStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        index: &str,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            descriptor: BackendDescriptor {
                id: "pinecone-1".to_string(),
                display_name: "Pinecone Vector DB".to_string(),
                kind: BackendKind::GenericVector,
                description: format!("Cloud-based Pinecone vector database (index '{}')", index),
            },
            embedder,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        let trimmed_url = self.base_url.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        format!("{}/{}", trimmed_url, trimmed_path)
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .header("Api-Key", self.api_key.as_str())
            .json(body)
            .send()
            .await
            .map_err(|e| SearchError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SearchError::Backend(format!(
                "{} returned {}",
                path,
                resp.status()
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| SearchError::MalformedRecord(e.to_string()))
    }

    async fn query(&self, query: &str, k: usize, filter: &SearchFilter) -> Result<Vec<RawMatch>> {
        let embedding = self.embedder.embed(query).await?;

        let request = QueryRequest {
            vector: embedding,
            top_k: k,
            include_metadata: true,
            filter: filter.to_native_filter(),
        };
        let response: QueryResponse = self.post("/query", &request).await?;

        let matches = response
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m.metadata.unwrap_or(Value::Null);
                // The content lives in metadata under "text", the shape the
                // ingestion pipeline writes for generic stores.
                let content = metadata
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                RawMatch {
                    content,
                    metadata,
                    similarity: m.score,
                }
            })
            .collect();

        Ok(matches)
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    async fn search(&self, query: &str, k: usize, filter: &SearchFilter) -> Result<Vec<RawMatch>> {
        match self.query(query, k, filter).await {
            Ok(matches) => Ok(matches),
            // No query vector means nothing can be scored anywhere; let the
            // orchestrator fail the whole search.
            Err(SearchError::Embedding(msg)) => Err(SearchError::Embedding(msg)),
            Err(err) => {
                tracing::warn!(backend = %self.descriptor.id, "search failed: {}", err);
                Ok(vec![])
            }
        }
    }

    async fn status(&self) -> BackendHealth {
        let stats: Result<IndexStats> = self
            .post("/describe_index_stats", &serde_json::json!({}))
            .await;

        match stats {
            Ok(stats) => {
                let vector_count = stats.total_vector_count.unwrap_or_else(|| {
                    stats.namespaces.values().map(|ns| ns.vector_count).sum()
                });
                BackendHealth {
                    name: self.descriptor.display_name.clone(),
                    status: HealthState::Ok,
                    details: format!("Connected to Pinecone. {} vectors found.", vector_count),
                    document_count: vector_count,
                    dimensions: stats.dimension,
                }
            }
            Err(err) => BackendHealth {
                name: self.descriptor.display_name.clone(),
                status: HealthState::Error,
                details: format!("Failed to connect to Pinecone: {}", err),
                document_count: 0,
                dimensions: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_request_serializes_pinecone_shape() {
        let request = QueryRequest {
            vector: vec![0.1, 0.2],
            top_k: 5,
            include_metadata: true,
            filter: Some(serde_json::json!({ "tags": { "$in": ["nasa"] } })),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["topK"], 5);
        assert_eq!(json["includeMetadata"], true);
        assert_eq!(json["filter"]["tags"]["$in"][0], "nasa");
    }

    #[test]
    fn query_response_parses_with_missing_fields() {
        let body = r#"{"matches": [{"id": "c1", "score": 0.88}]}"#;
        let response: QueryResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.matches.len(), 1);
        assert_eq!(response.matches[0].score, 0.88);
        assert!(response.matches[0].metadata.is_none());
    }

    #[test]
    fn index_stats_sums_namespaces_when_total_missing() {
        let body = r#"{
            "namespaces": {
                "a": {"vectorCount": 3},
                "b": {"vectorCount": 4}
            }
        }"#;
        let stats: IndexStats = serde_json::from_str(body).unwrap();
        let total: i64 = stats.namespaces.values().map(|ns| ns.vector_count).sum();

        assert!(stats.total_vector_count.is_none());
        assert_eq!(total, 7);
    }
}

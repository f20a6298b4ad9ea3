//! Core types for the search domain.

use serde::{Deserialize, Serialize};

/// Kind of physical vector backend. Selects the adapter implementation used
/// to query it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Backend reachable through direct SQL (pgvector).
    SqlVector,
    /// Backend reachable only through a generic nearest-neighbors API.
    GenericVector,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::SqlVector => write!(f, "sql_vector"),
            BackendKind::GenericVector => write!(f, "generic_vector"),
        }
    }
}

/// One configured physical vector store.
///
/// Registered at startup from configuration flags and never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendDescriptor {
    pub id: String,
    pub display_name: String,
    pub kind: BackendKind,
    pub description: String,
}

/// A named, tagged logical grouping of documents stored in backend metadata.
///
/// Read-only projection of persisted state; the search path never writes
/// collections.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionDescriptor {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// A scored document chunk, produced fresh per search call.
///
/// Ordering within a result list is the rank.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMatch {
    pub content: String,
    pub document_id: String,
    pub document_name: String,
    pub chunk_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<i64>,
    pub tags: Vec<String>,
    pub source_backend_id: String,
    pub source_backend_name: String,
    pub source_backend_kind: String,
    pub similarity: f64,
}

/// Raw scored record as a backend returns it, before normalization.
#[derive(Debug, Clone)]
pub struct RawMatch {
    pub content: String,
    pub metadata: serde_json::Value,
    pub similarity: f64,
}

/// Health of one backend as reported by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BackendHealth {
    pub name: String,
    pub status: HealthState,
    pub details: String,
    pub document_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Ok,
    Warning,
    Error,
}

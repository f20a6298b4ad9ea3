//! Trait definitions for search domain abstractions.
//!
//! These traits enable dependency injection and easy testing through mocking.

use async_trait::async_trait;

use super::filter::SearchFilter;
use super::types::{BackendDescriptor, BackendHealth, RawMatch};

/// Error type for search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Backend unreachable. Degrades to that backend contributing nothing.
    #[error("backend unreachable: {0}")]
    Connection(String),

    /// Expected table or column missing. Surfaces as a status warning and
    /// an empty result for search.
    #[error("schema mismatch: {0}")]
    Schema(String),

    /// Embedding provider call failed. Fatal to the search that needed it,
    /// since no match can be scored without a query vector.
    #[error("embedding generation failed: {0}")]
    Embedding(String),

    /// A row failed to parse into a match. Skipped, never fatal to a batch.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("{0}")]
    Backend(String),
}

impl From<sqlx::Error> for SearchError {
    fn from(e: sqlx::Error) -> Self {
        // Class 42 covers undefined tables/columns, which callers treat as a
        // schema warning rather than an outage.
        match &e {
            sqlx::Error::Database(db)
                if db.code().as_deref().is_some_and(|c| c.starts_with("42")) =>
            {
                SearchError::Schema(e.to_string())
            }
            _ => SearchError::Connection(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Trait for text embedding generation.
///
/// Abstracts the embedding provider (OpenAI-compatible endpoint, mocks).
/// A provider always returns vectors of the same fixed dimension.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    ///
    /// Errors propagate to the caller; there is no retry at this level.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Returns the embedding dimensions for this embedder.
    fn dimensions(&self) -> usize;
}

/// Capability interface over one physical vector store.
///
/// Concrete implementations are selected by [`BackendDescriptor`] kind, so
/// new backends can be added without touching the orchestrator.
#[async_trait]
pub trait VectorStore: Send + Sync {
    fn descriptor(&self) -> &BackendDescriptor;

    /// Similarity search against this backend.
    ///
    /// Returns raw scored matches; normalization into the canonical match
    /// shape happens in the orchestrator. Embedding failures must surface as
    /// [`SearchError::Embedding`].
    async fn search(&self, query: &str, k: usize, filter: &SearchFilter) -> Result<Vec<RawMatch>>;

    /// Connectivity and document-count report for the status endpoint.
    ///
    /// Never errors; failures are folded into the returned health record.
    async fn status(&self) -> BackendHealth;
}

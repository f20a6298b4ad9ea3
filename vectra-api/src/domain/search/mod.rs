//! Multi-backend similarity search over document chunks.
//!
//! The search system is built around trait abstractions for testability:
//!
//! - [`Embedder`] - Query embedding generation (OpenAI-compatible endpoint, mocks)
//! - [`VectorStore`] - One physical backend (pgvector SQL fast path, Pinecone
//!   generic fallback, mocks)
//! - [`SearchOrchestrator`] - Backend selection, concurrent fan-out and the
//!   merge into one ranked result list
//!
//! # Example
//!
//! ```ignore
//! let embedder = Arc::new(OpenAiEmbedder::from_settings(&settings.embeddings));
//! let store = Arc::new(PgVectorStore::new(pool, "documents".into(), embedder));
//! let orchestrator = SearchOrchestrator::new(vec![store], Duration::from_secs(10));
//!
//! let results = orchestrator.search("apollo guidance", 5, &filter).await?;
//! ```

pub mod embedder;
mod filter;
mod normalize;
mod orchestrator;
pub mod store;
mod traits;
mod types;

pub use filter::SearchFilter;
pub use orchestrator::{SearchOrchestrator, StatusReport};
pub use traits::{Embedder, SearchError, VectorStore};
pub use types::{
    BackendDescriptor, BackendHealth, BackendKind, CollectionDescriptor, DocumentMatch,
    HealthState, RawMatch,
};

//! Vector store adapter implementations.

#[cfg(test)]
mod mock;
mod pgvector;
mod pinecone;

#[cfg(test)]
pub use mock::{MockFailure, MockVectorStore};
pub use pgvector::PgVectorStore;
pub use pinecone::PineconeStore;

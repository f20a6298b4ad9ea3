mod client;
mod models;

pub use client::EmbedError;
pub use client::EmbeddingsClient;
pub use models::{Embedding, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage};

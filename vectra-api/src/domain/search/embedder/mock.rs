//! Mock embedder implementation for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::search::traits::{Embedder, Result, SearchError};

/// Mock embedder that returns configurable vectors.
#[derive(Clone)]
pub struct MockEmbedder {
    response: Arc<Vec<f32>>,
    fail: bool,
    call_count: Arc<AtomicUsize>,
}

impl MockEmbedder {
    /// Create a mock that always returns the same vector.
    pub fn returning(vector: Vec<f32>) -> Self {
        Self {
            response: Arc::new(vector),
            fail: false,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that fails every call.
    pub fn failing() -> Self {
        Self {
            response: Arc::new(vec![]),
            fail: true,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times `embed` was called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::returning(vec![0.0; 768])
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::Embedding("mock embedding failure".to_string()));
        }
        Ok(self.response.as_ref().clone())
    }

    fn dimensions(&self) -> usize {
        self.response.len()
    }
}

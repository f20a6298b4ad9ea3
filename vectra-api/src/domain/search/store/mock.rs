//! Mock vector store implementation for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::search::filter::SearchFilter;
use crate::domain::search::traits::{Result, SearchError, VectorStore};
use crate::domain::search::types::{
    BackendDescriptor, BackendHealth, BackendKind, HealthState, RawMatch,
};

/// Failure a mock store can be configured to produce on every search call.
#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    Connection,
    Schema,
    Embedding,
}

/// Mock store returning canned matches, a configured failure, or both after
/// an artificial delay.
pub struct MockVectorStore {
    descriptor: BackendDescriptor,
    matches: Vec<RawMatch>,
    failure: Option<MockFailure>,
    delay: Option<Duration>,
    call_count: Arc<AtomicUsize>,
}

impl MockVectorStore {
    pub fn sql(id: &str) -> Self {
        Self::with_kind(id, BackendKind::SqlVector)
    }

    pub fn generic(id: &str) -> Self {
        Self::with_kind(id, BackendKind::GenericVector)
    }

    fn with_kind(id: &str, kind: BackendKind) -> Self {
        Self {
            descriptor: BackendDescriptor {
                id: id.to_string(),
                display_name: format!("Mock store {}", id),
                kind,
                description: "in-memory mock".to_string(),
            },
            matches: vec![],
            failure: None,
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_matches(mut self, matches: Vec<RawMatch>) -> Self {
        self.matches = matches;
        self
    }

    pub fn failing_with(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Handle onto the search call counter, usable after the store is moved
    /// into an orchestrator.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.call_count.clone()
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    async fn search(&self, _query: &str, k: usize, filter: &SearchFilter) -> Result<Vec<RawMatch>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(failure) = self.failure {
            return Err(match failure {
                MockFailure::Connection => SearchError::Connection("mock down".to_string()),
                MockFailure::Schema => SearchError::Schema("mock table missing".to_string()),
                MockFailure::Embedding => SearchError::Embedding("mock embed failed".to_string()),
            });
        }

        Ok(self
            .matches
            .iter()
            .filter(|m| filter.matches_metadata(&m.metadata))
            .take(k)
            .cloned()
            .collect())
    }

    async fn status(&self) -> BackendHealth {
        let (status, details) = match self.failure {
            None => (HealthState::Ok, "mock is healthy".to_string()),
            Some(_) => (HealthState::Error, "mock is failing".to_string()),
        };
        BackendHealth {
            name: self.descriptor.display_name.clone(),
            status,
            details,
            document_count: self.matches.len() as i64,
            dimensions: None,
        }
    }
}

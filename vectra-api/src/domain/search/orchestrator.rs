//! Multi-backend search orchestration.
//!
//! Turns a query string into a ranked, filtered set of document matches drawn
//! from every configured vector store: SQL fast path first, generic fan-out
//! as the fallback, then a deterministic merge.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::time::timeout;

use super::filter::SearchFilter;
use super::normalize;
use super::traits::{Result, SearchError, VectorStore};
use super::types::{BackendDescriptor, BackendHealth, BackendKind, DocumentMatch, HealthState};

/// Per-backend health keyed by backend id, plus an overall verdict.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub status: HealthState,
    pub vector_stores: BTreeMap<String, BackendHealth>,
}

/// Orchestrates similarity search across the configured vector stores.
///
/// Constructed once at startup with its adapter set and passed by handle to
/// the routing layer. Search is a pure read path: no orchestrator state is
/// mutated by a call, so any number of searches may run concurrently.
pub struct SearchOrchestrator {
    stores: Vec<Arc<dyn VectorStore>>,
    backend_timeout: Duration,
}

impl SearchOrchestrator {
    pub fn new(stores: Vec<Arc<dyn VectorStore>>, backend_timeout: Duration) -> Self {
        Self {
            stores,
            backend_timeout,
        }
    }

    /// Descriptors of all registered backends.
    pub fn backends(&self) -> Vec<BackendDescriptor> {
        self.stores.iter().map(|s| s.descriptor().clone()).collect()
    }

    /// Search across vector stores with optional filters.
    ///
    /// A SQL-capable backend is tried first as a fast path; a non-empty result
    /// from it is returned directly, bypassing the other backends entirely.
    /// This is a deliberate performance short-circuit: matches from other
    /// enabled backends are silently omitted whenever the fast path succeeds
    /// and `backend_ids` does not exclude it.
    ///
    /// Otherwise every candidate backend (enabled ∩ `backend_ids`) is queried
    /// concurrently, each under its own timeout, and the merged results are
    /// sorted by similarity descending and truncated to `k`.
    pub async fn search(
        &self,
        query: &str,
        k: i64,
        filter: &SearchFilter,
    ) -> Result<Vec<DocumentMatch>> {
        if k <= 0 {
            return Ok(vec![]);
        }
        let k = k as usize;

        if let Some(results) = self.try_fast_path(query, k, filter).await? {
            return Ok(results);
        }

        let candidates: Vec<Arc<dyn VectorStore>> = self
            .stores
            .iter()
            .filter(|s| filter.allows_backend(&s.descriptor().id))
            .cloned()
            .collect();
        if candidates.is_empty() {
            tracing::debug!("no vector stores available for search");
            return Ok(vec![]);
        }

        // Fan out concurrently, but keep per-backend buckets indexed by
        // registration order so the merge is deterministic regardless of
        // which backend finishes first.
        let mut buckets: Vec<Vec<DocumentMatch>> = vec![vec![]; candidates.len()];
        let mut tasks: FuturesUnordered<_> = candidates
            .iter()
            .enumerate()
            .map(|(idx, store)| {
                let store = store.clone();
                async move {
                    let outcome = timeout(self.backend_timeout, store.search(query, k, filter)).await;
                    (idx, store.descriptor().clone(), outcome)
                }
            })
            .collect();

        while let Some((idx, descriptor, outcome)) = tasks.next().await {
            match outcome {
                Ok(Ok(raw)) => {
                    buckets[idx] = raw
                        .into_iter()
                        .map(|r| normalize::to_document_match(r, &descriptor))
                        .collect();
                }
                Ok(Err(SearchError::Embedding(msg))) => return Err(SearchError::Embedding(msg)),
                Ok(Err(err)) => {
                    tracing::warn!(backend = %descriptor.id, "error searching store: {}", err);
                }
                Err(_) => {
                    tracing::warn!(
                        backend = %descriptor.id,
                        "store timed out after {:?}",
                        self.backend_timeout
                    );
                }
            }
        }

        let mut results: Vec<DocumentMatch> = buckets.into_iter().flatten().collect();
        // Stable sort: ties keep backend-then-arrival order.
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    /// Attempt the direct SQL path. Returns `Ok(Some(..))` only for a
    /// non-empty result; errors other than embedding failure fall through to
    /// the generic path.
    async fn try_fast_path(
        &self,
        query: &str,
        k: usize,
        filter: &SearchFilter,
    ) -> Result<Option<Vec<DocumentMatch>>> {
        let Some(store) = self.stores.iter().find(|s| {
            s.descriptor().kind == BackendKind::SqlVector
                && filter.allows_backend(&s.descriptor().id)
        }) else {
            return Ok(None);
        };

        let descriptor = store.descriptor();
        match timeout(self.backend_timeout, store.search(query, k, filter)).await {
            Ok(Ok(raw)) if !raw.is_empty() => {
                let results = raw
                    .into_iter()
                    .map(|r| normalize::to_document_match(r, descriptor))
                    .collect();
                Ok(Some(results))
            }
            Ok(Ok(_)) => {
                tracing::debug!(backend = %descriptor.id, "fast path empty, falling back");
                Ok(None)
            }
            Ok(Err(SearchError::Embedding(msg))) => Err(SearchError::Embedding(msg)),
            Ok(Err(err)) => {
                tracing::warn!(backend = %descriptor.id, "fast path failed, falling back: {}", err);
                Ok(None)
            }
            Err(_) => {
                tracing::warn!(
                    backend = %descriptor.id,
                    "fast path timed out after {:?}, falling back",
                    self.backend_timeout
                );
                Ok(None)
            }
        }
    }

    /// Check connectivity to all configured vector stores.
    ///
    /// One backend being down never fails the report; it shows up as an
    /// `error` entry and flips the overall status.
    pub async fn statuses(&self) -> StatusReport {
        let mut tasks: FuturesUnordered<_> = self
            .stores
            .iter()
            .map(|store| async move { (store.descriptor().id.clone(), store.status().await) })
            .collect();

        let mut vector_stores = BTreeMap::new();
        while let Some((id, health)) = tasks.next().await {
            vector_stores.insert(id, health);
        }

        let has_errors = vector_stores
            .values()
            .any(|h| h.status == HealthState::Error);
        StatusReport {
            status: if has_errors {
                HealthState::Error
            } else {
                HealthState::Ok
            },
            vector_stores,
        }
    }
}

use std::sync::Arc;

use crate::domain::search::SearchOrchestrator;
use crate::repositories::CollectionRepositoryImpl;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SearchOrchestrator>,
    pub collection_repo: Arc<CollectionRepositoryImpl>,
}

impl AppState {
    pub fn new(
        orchestrator: SearchOrchestrator,
        collection_repo: CollectionRepositoryImpl,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            collection_repo: Arc::new(collection_repo),
        }
    }
}

use std::sync::Arc;

use service::store::{CounterRepository, ScoreRepository, SeaOrmStore};

/// Shared handler state: the storage handles, nothing else.
#[derive(Clone)]
pub struct ServerState {
    pub counters: Arc<dyn CounterRepository>,
    pub scores: Arc<dyn ScoreRepository>,
}

impl ServerState {
    pub fn from_store(store: SeaOrmStore) -> Self {
        let store = Arc::new(store);
        Self {
            counters: Arc::clone(&store) as Arc<dyn CounterRepository>,
            scores: store,
        }
    }
}

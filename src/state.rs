use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::store::{DynamoStore, EventStore, MemoryStore};

/// Shared application state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn EventStore> = match config.store_backend {
            StoreBackend::DynamoDb => {
                tracing::info!(table = %config.dynamodb.table, "Using DynamoDB store");
                Arc::new(DynamoStore::new(config.dynamodb.clone()))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };
        Self::new(store)
    }
}

use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::SecurityHeaders;

use crate::store::DynamoSettings;

const DEFAULT_EVENTS_TABLE: &str = "events-table-dev";
const DEFAULT_PORT: u16 = 3001;

/// DynamoDB Local, used when `IS_OFFLINE` is set.
const OFFLINE_ENDPOINT: &str = "http://localhost:8000";
const OFFLINE_REGION: &str = "localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub dynamodb: DynamoSettings,
    /// Comma-separated allow-list; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let offline = var("IS_OFFLINE").is_some();

        let port = match var("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Config: invalid PORT '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let store_backend = match var("STORE_BACKEND").map(|v| v.to_lowercase()).as_deref() {
            None | Some("dynamodb") | Some("dynamo") => StoreBackend::DynamoDb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                tracing::warn!("Config: unknown STORE_BACKEND '{}', using dynamodb", other);
                StoreBackend::DynamoDb
            }
        };

        let dynamodb = DynamoSettings {
            table: var("EVENTS_TABLE").unwrap_or_else(|| DEFAULT_EVENTS_TABLE.to_string()),
            endpoint: var("DYNAMODB_ENDPOINT")
                .or_else(|| offline.then(|| OFFLINE_ENDPOINT.to_string())),
            region: var("AWS_REGION").or_else(|| offline.then(|| OFFLINE_REGION.to_string())),
        };

        Self {
            port,
            store_backend,
            dynamodb,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),
            production: var("RUST_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production")),
        }
    }
}

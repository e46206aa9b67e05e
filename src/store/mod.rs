//! Persistence seam for event items.
//!
//! Every event lives in a single item keyed by `eventId`; queues, coupons and
//! visitors are nested maps inside it. Writes are either a full replace
//! (`put_item`) or a single conditional `update_item` that returns the whole
//! item as it looks after the update.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

pub mod dynamo;
pub mod memory;

pub use dynamo::{DynamoSettings, DynamoStore};
pub use memory::MemoryStore;

/// Name of the partition key attribute.
pub const KEY_ATTRIBUTE: &str = "eventId";

/// A stored item, already decoded into plain JSON.
pub type Item = Map<String, Value>;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("conditional check failed")]
    ConditionFailed,

    #[error("invalid document path: {0}")]
    InvalidPath(String),

    #[error("store request failed: {0}")]
    Backend(String),

    #[error("malformed item: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetch a whole item by key.
    async fn get_item(&self, key: &str) -> Result<Option<Item>, StoreError>;

    /// Replace (or create) the item identified by its `eventId` attribute.
    async fn put_item(&self, item: Item) -> Result<(), StoreError>;

    /// Apply a conditional update and return the full item after it.
    async fn update_item(&self, update: UpdateItem) -> Result<Item, StoreError>;
}

/// Dotted path into nested map attributes, e.g. `eventoFilas.Q1.quantPessoas`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath(Vec<String>);

impl AttributePath {
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.0.push(name.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The path without its last segment, `None` for top-level attributes.
    pub fn parent(&self) -> Option<&[String]> {
        match self.0.len() {
            0 | 1 => None,
            n => Some(&self.0[..n - 1]),
        }
    }

    pub fn leaf(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// `SET path = value`
    Set { path: AttributePath, value: Value },
    /// `SET path = path + delta` (or `- |delta|`); the attribute must exist.
    Add { path: AttributePath, delta: i64 },
    /// `REMOVE path`
    Remove { path: AttributePath },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    AttributeExists(AttributePath),
    AttributeNotExists(AttributePath),
    GreaterThan(AttributePath, i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateItem {
    pub key: String,
    pub actions: Vec<UpdateAction>,
    pub condition: Option<Condition>,
}

impl UpdateItem {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            actions: Vec::new(),
            condition: None,
        }
    }

    pub fn set(mut self, path: AttributePath, value: impl Into<Value>) -> Self {
        self.actions.push(UpdateAction::Set {
            path,
            value: value.into(),
        });
        self
    }

    pub fn add(mut self, path: AttributePath, delta: i64) -> Self {
        self.actions.push(UpdateAction::Add { path, delta });
        self
    }

    pub fn remove(mut self, path: AttributePath) -> Self {
        self.actions.push(UpdateAction::Remove { path });
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_path_parent_and_leaf() {
        let path = AttributePath::root("eventoFilas")
            .child("Q1")
            .child("quantPessoas");

        assert_eq!(path.to_string(), "eventoFilas.Q1.quantPessoas");
        assert_eq!(path.leaf(), "quantPessoas");
        assert_eq!(
            path.parent(),
            Some(&["eventoFilas".to_string(), "Q1".to_string()][..])
        );
        assert_eq!(AttributePath::root("eventoNome").parent(), None);
    }

    #[test]
    fn test_update_builder_keeps_action_order() {
        let update = UpdateItem::new("E1")
            .set(AttributePath::root("a"), json!(1))
            .remove(AttributePath::root("b"))
            .add(AttributePath::root("c"), -1)
            .condition(Condition::AttributeExists(AttributePath::root("a")));

        assert_eq!(update.key, "E1");
        assert_eq!(update.actions.len(), 3);
        assert!(matches!(update.actions[1], UpdateAction::Remove { .. }));
        assert!(update.condition.is_some());
    }
}

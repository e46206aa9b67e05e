//! Process-local store with the same update semantics as DynamoDB.
//!
//! Used by `STORE_BACKEND=memory` and by the test suite.

use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{
    AttributePath, Condition, EventStore, Item, StoreError, UpdateAction, UpdateItem,
    KEY_ATTRIBUTE,
};

#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn put_item(&self, item: Item) -> Result<(), StoreError> {
        let key = item
            .get(KEY_ATTRIBUTE)
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| StoreError::Malformed(format!("item has no {KEY_ATTRIBUTE}")))?
            .to_string();

        self.items.write().await.insert(key, item);
        Ok(())
    }

    async fn update_item(&self, update: UpdateItem) -> Result<Item, StoreError> {
        let mut items = self.items.write().await;

        // Updating a missing key creates the item, as DynamoDB does.
        let mut item = items.get(&update.key).cloned().unwrap_or_else(|| {
            let mut item = Map::new();
            item.insert(KEY_ATTRIBUTE.to_string(), Value::String(update.key.clone()));
            item
        });

        if let Some(condition) = &update.condition {
            if !evaluate(&item, condition) {
                return Err(StoreError::ConditionFailed);
            }
        }

        for action in &update.actions {
            apply(&mut item, action)?;
        }

        items.insert(update.key, item.clone());
        Ok(item)
    }
}

fn lookup<'a>(item: &'a Item, segments: &[String]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = item.get(first)?;
    for segment in rest {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn evaluate(item: &Item, condition: &Condition) -> bool {
    match condition {
        Condition::AttributeExists(path) => lookup(item, path.segments()).is_some(),
        Condition::AttributeNotExists(path) => lookup(item, path.segments()).is_none(),
        Condition::GreaterThan(path, bound) => lookup(item, path.segments())
            .and_then(Value::as_f64)
            .is_some_and(|value| value > *bound as f64),
    }
}

fn invalid(path: &AttributePath) -> StoreError {
    StoreError::InvalidPath(format!(
        "the document path {path} is invalid for update"
    ))
}

fn parent_mut<'a>(item: &'a mut Item, path: &AttributePath) -> Result<&'a mut Item, StoreError> {
    let Some(parent) = path.parent() else {
        return Ok(item);
    };

    let mut current = item;
    for segment in parent {
        current = current
            .get_mut(segment)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| invalid(path))?;
    }
    Ok(current)
}

fn apply(item: &mut Item, action: &UpdateAction) -> Result<(), StoreError> {
    match action {
        UpdateAction::Set { path, value } => {
            parent_mut(item, path)?.insert(path.leaf().to_string(), value.clone());
        }
        UpdateAction::Add { path, delta } => {
            let parent = parent_mut(item, path)?;
            let current = parent.get(path.leaf()).ok_or_else(|| invalid(path))?;
            let sum = add_number(current, *delta).ok_or_else(|| {
                StoreError::InvalidPath(format!(
                    "an operand in the update expression has an incorrect data type: {path}"
                ))
            })?;
            parent.insert(path.leaf().to_string(), sum);
        }
        UpdateAction::Remove { path } => {
            parent_mut(item, path)?.remove(path.leaf());
        }
    }
    Ok(())
}

fn add_number(current: &Value, delta: i64) -> Option<Value> {
    if let Some(n) = current.as_i64() {
        return n.checked_add(delta).map(Value::from);
    }
    let n = current.as_f64()?;
    Number::from_f64(n + delta as f64).map(Value::Number)
}

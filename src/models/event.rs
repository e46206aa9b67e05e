use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{EVENTO_DATA, EVENTO_FILAS, EVENTO_NOME, EVENTO_SERVICOS, EVENTO_VISITANTES};
use crate::store::{Item, StoreError, KEY_ATTRIBUTE};
use crate::utils::coerce;

/// Root record. Queues, coupons and visitors are kept as free-form maps so
/// whatever the nested handlers wrote is returned untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: String,
    #[serde(default)]
    pub evento_nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evento_data: Option<String>,
    #[serde(default)]
    pub evento_filas: Map<String, Value>,
    #[serde(default)]
    pub evento_servicos: Map<String, Value>,
    #[serde(default)]
    pub evento_visitantes: Map<String, Value>,
}

impl Event {
    pub fn from_item(item: Item) -> Result<Self, StoreError> {
        serde_json::from_value(Value::Object(item))
            .map_err(|e| StoreError::Malformed(format!("event item: {e}")))
    }

    pub fn into_item(self) -> Item {
        let mut item = Item::new();
        item.insert(KEY_ATTRIBUTE.to_string(), Value::String(self.event_id));
        item.insert(EVENTO_NOME.to_string(), Value::String(self.evento_nome));
        if let Some(data) = self.evento_data {
            item.insert(EVENTO_DATA.to_string(), Value::String(data));
        }
        item.insert(EVENTO_FILAS.to_string(), Value::Object(self.evento_filas));
        item.insert(EVENTO_SERVICOS.to_string(), Value::Object(self.evento_servicos));
        item.insert(
            EVENTO_VISITANTES.to_string(),
            Value::Object(self.evento_visitantes),
        );
        item
    }
}

/// Body of `POST /events` and `PUT /events/{eventId}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub evento_nome: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub evento_data: Option<String>,
    #[serde(default)]
    pub evento_filas: Option<Map<String, Value>>,
    #[serde(default)]
    pub evento_servicos: Option<Map<String, Value>>,
    #[serde(default)]
    pub evento_visitantes: Option<Map<String, Value>>,
}

impl EventPayload {
    /// `eventId` if present and non-empty.
    pub fn event_id(&self) -> Option<&str> {
        self.event_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn evento_nome(&self) -> Option<&str> {
        self.evento_nome.as_deref().filter(|nome| !nome.is_empty())
    }

    pub fn into_event(self, event_id: String) -> Event {
        Event {
            event_id,
            evento_nome: self.evento_nome.unwrap_or_default(),
            evento_data: self.evento_data,
            evento_filas: self.evento_filas.unwrap_or_default(),
            evento_servicos: self.evento_servicos.unwrap_or_default(),
            evento_visitantes: self.evento_visitantes.unwrap_or_default(),
        }
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::SEM_FILA;
use crate::utils::coerce;

fn sem_fila() -> String {
    SEM_FILA.to_string()
}

/// A visitor entry under `eventoVisitantes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitante {
    #[serde(deserialize_with = "coerce::id")]
    pub id_visitante: String,
    /// Queue the visitor currently occupies, `"0"` when none.
    #[serde(default = "sem_fila", deserialize_with = "coerce::string")]
    pub id_fila: String,
    /// Coupon id to redemption timestamp.
    #[serde(default)]
    pub cupons_usados: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

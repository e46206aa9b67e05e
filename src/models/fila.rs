use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::coerce;

/// A queue entry under `eventoFilas`. Unknown fields are stored as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fila {
    #[serde(deserialize_with = "coerce::id")]
    pub id_fila: String,
    #[serde(deserialize_with = "coerce::integer")]
    pub quant_pessoas: i64,
    #[serde(
        default,
        deserialize_with = "coerce::opt_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub fila_ativa: Option<bool>,
    #[serde(
        default,
        deserialize_with = "coerce::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub tempo_fila: Option<String>,
    /// Visitor id to the epoch timestamp of when they joined.
    #[serde(default)]
    pub pessoas_fila: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PUT /events/{id}/fila/{filaId}/status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilaStatus {
    #[serde(deserialize_with = "coerce::flag")]
    pub fila_ativa: bool,
}

/// Body of `PUT /events/{id}/fila/{filaId}/time`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilaTempo {
    #[serde(deserialize_with = "coerce::string")]
    pub tempo_fila: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fila_coerces_and_keeps_extra_fields() {
        let fila: Fila = serde_json::from_value(json!({
            "idFila": 1,
            "quantPessoas": "5",
            "nome": "Entrada"
        }))
        .unwrap();

        assert_eq!(fila.id_fila, "1");
        assert_eq!(fila.quant_pessoas, 5);
        assert_eq!(fila.fila_ativa, None);

        let stored = serde_json::to_value(&fila).unwrap();
        assert_eq!(
            stored,
            json!({
                "idFila": "1",
                "quantPessoas": 5,
                "pessoasFila": {},
                "nome": "Entrada"
            })
        );
    }

    #[test]
    fn test_fila_requires_id_and_count() {
        assert!(serde_json::from_value::<Fila>(json!({ "quantPessoas": 1 })).is_err());
        assert!(serde_json::from_value::<Fila>(json!({ "idFila": "Q1" })).is_err());
        assert!(serde_json::from_value::<Fila>(json!({ "idFila": "", "quantPessoas": 1 })).is_err());
    }

    #[test]
    fn test_status_body_requires_flag() {
        assert!(serde_json::from_value::<FilaStatus>(json!({})).is_err());
        let status: FilaStatus = serde_json::from_value(json!({ "filaAtiva": false })).unwrap();
        assert!(!status.fila_ativa);
    }
}

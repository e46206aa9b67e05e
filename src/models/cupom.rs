use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::coerce;

/// A redeemable service entitlement under `eventoServicos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cupom {
    #[serde(deserialize_with = "coerce::id")]
    pub id_cupom: String,
    /// Remaining redemptions.
    #[serde(deserialize_with = "coerce::integer")]
    pub quantidade: i64,
    #[serde(default)]
    pub pessoas_cupom: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

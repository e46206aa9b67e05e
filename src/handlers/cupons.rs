//! Coupon handlers under `/events/{eventId}/cupom`.

use axum::extract::{Path, State};
use axum::Json;
use tracing::{info, warn};

use super::{cupom_path, require_event_id, to_value, visitante_path};
use crate::models::{Cupom, CUPONS_USADOS, PESSOAS_CUPOM, QUANTIDADE};
use crate::state::AppState;
use crate::store::{Condition, Item, StoreError, UpdateItem};
use crate::utils::error::AppResult;
use crate::utils::extract::JsonBody;
use crate::utils::time::epoch_timestamp;

pub async fn upsert_cupom(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    JsonBody(cupom): JsonBody<Cupom>,
) -> AppResult<Json<Item>> {
    require_event_id(&event_id)?;

    let update = UpdateItem::new(&event_id).set(cupom_path(&cupom.id_cupom), to_value(&cupom)?);
    let item = state.store.update_item(update).await?;

    info!(
        event_id = %event_id,
        cupom_id = %cupom.id_cupom,
        quantidade = cupom.quantidade,
        "Coupon upserted"
    );
    Ok(Json(item))
}

/// Records the redemption on both the coupon and the visitor and takes one
/// unit off `quantidade`, all in one update that requires `quantidade > 0`.
pub async fn redeem_cupom(
    State(state): State<AppState>,
    Path((event_id, cupom_id, visitante_id)): Path<(String, String, String)>,
) -> AppResult<Json<Item>> {
    require_event_id(&event_id)?;

    let now = epoch_timestamp();
    let quantidade = cupom_path(&cupom_id).child(QUANTIDADE);
    let update = UpdateItem::new(&event_id)
        .set(
            cupom_path(&cupom_id).child(PESSOAS_CUPOM).child(&visitante_id),
            now.as_str(),
        )
        .add(quantidade.clone(), -1)
        .set(
            visitante_path(&visitante_id).child(CUPONS_USADOS).child(&cupom_id),
            now.as_str(),
        )
        .condition(Condition::GreaterThan(quantidade, 0));

    let item = state.store.update_item(update).await.map_err(|e| {
        if e == StoreError::ConditionFailed {
            warn!(event_id = %event_id, cupom_id = %cupom_id, visitante_id = %visitante_id, "Coupon exhausted");
        }
        e
    })?;

    info!(event_id = %event_id, cupom_id = %cupom_id, visitante_id = %visitante_id, "Coupon redeemed");
    Ok(Json(item))
}

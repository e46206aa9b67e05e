use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use super::{require_event_id, to_value, visitante_path};
use crate::models::Visitante;
use crate::state::AppState;
use crate::store::{Item, UpdateItem};
use crate::utils::error::AppResult;
use crate::utils::extract::JsonBody;

/// Writes the whole visitor entry; queue membership and redemptions on the
/// previous entry are replaced by what the body carries.
pub async fn upsert_visitante(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    JsonBody(visitante): JsonBody<Visitante>,
) -> AppResult<Json<Item>> {
    require_event_id(&event_id)?;

    let update = UpdateItem::new(&event_id)
        .set(visitante_path(&visitante.id_visitante), to_value(&visitante)?);
    let item = state.store.update_item(update).await?;

    info!(event_id = %event_id, visitante_id = %visitante.id_visitante, "Visitor upserted");
    Ok(Json(item))
}

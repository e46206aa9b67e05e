//! Queue handlers under `/events/{eventId}/fila`.

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use super::{fila_path, require_event_id, to_value, visitante_path};
use crate::models::fila::{FilaStatus, FilaTempo};
use crate::models::{Fila, FILA_ATIVA, ID_FILA, PESSOAS_FILA, QUANT_PESSOAS, SEM_FILA, TEMPO_FILA};
use crate::state::AppState;
use crate::store::{Condition, Item, StoreError, UpdateItem};
use crate::utils::error::AppResult;
use crate::utils::extract::JsonBody;
use crate::utils::time::epoch_timestamp;

/// Writes the whole queue entry, replacing any previous one.
pub async fn upsert_fila(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    JsonBody(fila): JsonBody<Fila>,
) -> AppResult<Json<Item>> {
    require_event_id(&event_id)?;

    let update = UpdateItem::new(&event_id).set(fila_path(&fila.id_fila), to_value(&fila)?);
    let item = state.store.update_item(update).await?;

    info!(
        event_id = %event_id,
        fila_id = %fila.id_fila,
        quant_pessoas = fila.quant_pessoas,
        "Queue upserted"
    );
    Ok(Json(item))
}

/// Only queues created with a `filaAtiva` attribute can be toggled.
pub async fn set_fila_status(
    State(state): State<AppState>,
    Path((event_id, fila_id)): Path<(String, String)>,
    JsonBody(status): JsonBody<FilaStatus>,
) -> AppResult<Json<Item>> {
    require_event_id(&event_id)?;

    let path = fila_path(&fila_id).child(FILA_ATIVA);
    let update = UpdateItem::new(&event_id)
        .set(path.clone(), status.fila_ativa)
        .condition(Condition::AttributeExists(path));
    let item = state.store.update_item(update).await?;

    info!(event_id = %event_id, fila_id = %fila_id, fila_ativa = status.fila_ativa, "Queue status set");
    Ok(Json(item))
}

pub async fn set_fila_tempo(
    State(state): State<AppState>,
    Path((event_id, fila_id)): Path<(String, String)>,
    JsonBody(tempo): JsonBody<FilaTempo>,
) -> AppResult<Json<Item>> {
    require_event_id(&event_id)?;

    let update = UpdateItem::new(&event_id)
        .set(fila_path(&fila_id).child(TEMPO_FILA), tempo.tempo_fila.as_str());
    let item = state.store.update_item(update).await?;

    info!(event_id = %event_id, fila_id = %fila_id, tempo_fila = %tempo.tempo_fila, "Queue wait time set");
    Ok(Json(item))
}

/// Puts the visitor in the queue, or takes them out if already there.
///
/// The join is attempted first, guarded by the visitor being absent from
/// `pessoasFila`. Only a failed condition selects the leave branch; any other
/// store error is returned as is. Two concurrent joins for the same visitor
/// can still end with one join and one leave, since each branch is its own
/// conditional update.
pub async fn toggle_fila_visitante(
    State(state): State<AppState>,
    Path((event_id, fila_id, visitante_id)): Path<(String, String, String)>,
) -> AppResult<Json<Item>> {
    require_event_id(&event_id)?;

    let member = fila_path(&fila_id).child(PESSOAS_FILA).child(&visitante_id);
    let count = fila_path(&fila_id).child(QUANT_PESSOAS);
    let visitor_fila = visitante_path(&visitante_id).child(ID_FILA);

    let join = UpdateItem::new(&event_id)
        .set(member.clone(), epoch_timestamp())
        .add(count.clone(), 1)
        .set(visitor_fila.clone(), fila_id.as_str())
        .condition(Condition::AttributeNotExists(member.clone()));

    match state.store.update_item(join).await {
        Ok(item) => {
            info!(event_id = %event_id, fila_id = %fila_id, visitante_id = %visitante_id, "Visitor joined queue");
            Ok(Json(item))
        }
        Err(StoreError::ConditionFailed) => {
            let leave = UpdateItem::new(&event_id)
                .remove(member.clone())
                .add(count, -1)
                .set(visitor_fila, SEM_FILA)
                .condition(Condition::AttributeExists(member));
            let item = state.store.update_item(leave).await?;

            info!(event_id = %event_id, fila_id = %fila_id, visitante_id = %visitante_id, "Visitor left queue");
            Ok(Json(item))
        }
        Err(e) => Err(e.into()),
    }
}

//! `/events` and `/events/{eventId}`: whole-event reads and full replaces.

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use super::require_event_id;
use crate::models::{Event, EventPayload};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::extract::JsonBody;

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> AppResult<Json<Event>> {
    let item = state
        .store
        .get_item(&event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event does not exist".to_string()))?;

    Ok(Json(Event::from_item(item)?))
}

/// Unconditional put: an existing event with the same id is overwritten.
pub async fn create_event(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<EventPayload>,
) -> AppResult<Json<Event>> {
    let event_id = match (payload.event_id(), payload.evento_nome()) {
        (Some(event_id), Some(_)) => event_id.to_string(),
        _ => {
            return Err(AppError::ValidationError(
                "Please provide eventId and eventoNome".to_string(),
            ))
        }
    };

    let event = payload.into_event(event_id);
    state.store.put_item(event.clone().into_item()).await?;

    info!(event_id = %event.event_id, "Event created");
    Ok(Json(event))
}

/// Full replace. The body must repeat the path's `eventId`.
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    JsonBody(payload): JsonBody<EventPayload>,
) -> AppResult<Json<Event>> {
    require_event_id(&event_id)?;

    let body_id = payload
        .event_id()
        .ok_or_else(|| AppError::ValidationError("Please provide eventId".to_string()))?;
    if body_id != event_id {
        return Err(AppError::ValidationError(format!(
            "eventId '{body_id}' does not match the event in the path"
        )));
    }

    let event = payload.into_event(event_id);
    state.store.put_item(event.clone().into_item()).await?;

    info!(event_id = %event.event_id, "Event replaced");
    Ok(Json(event))
}

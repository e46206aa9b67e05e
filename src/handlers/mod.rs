use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::models::{EVENTO_FILAS, EVENTO_SERVICOS, EVENTO_VISITANTES};
use crate::store::AttributePath;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::success;

pub mod cupons;
pub mod events;
pub mod filas;
pub mod visitantes;

const GREETING: &str =
    "Hello World! That's the STI Broker endpoint. Wash your hands and go ahead.";

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn root() -> &'static str {
    GREETING
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "filas-api",
    };

    success(payload, "Health check successful").into_response()
}

fn require_event_id(event_id: &str) -> AppResult<()> {
    if event_id.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Please provide eventId".to_string(),
        ));
    }
    Ok(())
}

fn to_value<T: Serialize>(entry: &T) -> AppResult<Value> {
    serde_json::to_value(entry).map_err(|e| AppError::InternalServerError(e.to_string()))
}

fn fila_path(fila_id: &str) -> AttributePath {
    AttributePath::root(EVENTO_FILAS).child(fila_id)
}

fn cupom_path(cupom_id: &str) -> AttributePath {
    AttributePath::root(EVENTO_SERVICOS).child(cupom_id)
}

fn visitante_path(visitante_id: &str) -> AttributePath {
    AttributePath::root(EVENTO_VISITANTES).child(visitante_id)
}

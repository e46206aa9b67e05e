use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, Config, SecurityHeaders};
use crate::handlers::{cupons, events, filas, health_check, root, visitantes};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/events", post(events::create_event))
        .route(
            "/events/:event_id",
            get(events::get_event).put(events::update_event),
        )
        .route("/events/:event_id/fila", put(filas::upsert_fila))
        .route(
            "/events/:event_id/fila/:fila_id/status",
            put(filas::set_fila_status),
        )
        .route(
            "/events/:event_id/fila/:fila_id/time",
            put(filas::set_fila_tempo),
        )
        .route(
            "/events/:event_id/fila/:fila_id/visitante/:visitante_id",
            put(filas::toggle_fila_visitante),
        )
        .route("/events/:event_id/cupom", put(cupons::upsert_cupom))
        .route(
            "/events/:event_id/cupom/:cupom_id/visitante/:visitante_id",
            put(cupons::redeem_cupom),
        )
        .route("/events/:event_id/visitante", put(visitantes::upsert_visitante))
        .with_state(state);

    SecurityHeaders::new(config.production).apply(api).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(config.cors_allowed_origins.as_deref())),
    )
}

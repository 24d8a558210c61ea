//! HTTP layer: router composition and system endpoints.

pub mod system;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete application router: `/ws`, `/health`, and the
/// HTTP tracing and CORS layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(system::routes())
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

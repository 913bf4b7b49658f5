use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ownreg_protocol::endpoints;

use crate::config::ServerConfig;
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all owner registry endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(
            endpoints::OWNERS,
            get(handler::list_owners).post(handler::create_owner),
        )
        .route(
            endpoints::OWNER,
            axum::routing::patch(handler::update_owner).delete(handler::delete_owner),
        )
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.allow_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

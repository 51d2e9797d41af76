use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub mod config;
pub mod handlers;
pub mod i18n;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .nest("/api/v1/blocks", blocks_routes())
        .route(
            "/api/v1/tips/{tip_id}/validate",
            post(handlers::blocks::validate_tip),
        )
        .with_state(app_state)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

fn blocks_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::blocks::create_block))
        .route("/import", post(handlers::blocks::import_block))
        .route(
            "/{id}",
            get(handlers::blocks::get_block).put(handlers::blocks::update_block),
        )
        .route("/{id}/choices", post(handlers::blocks::add_choice))
        .route(
            "/{id}/choices/{value}",
            delete(handlers::blocks::delete_choice),
        )
        .route("/{id}/tips", post(handlers::blocks::add_tip))
        .route("/{id}/tips/import", post(handlers::blocks::import_tip))
        .route(
            "/{id}/tips/{tip_id}",
            get(handlers::blocks::get_tip)
                .put(handlers::blocks::update_tip)
                .delete(handlers::blocks::delete_tip),
        )
        .route("/{id}/validate", post(handlers::blocks::validate_block))
        .route("/{id}/submit", post(handlers::blocks::submit))
        .route("/{id}/author_view", get(handlers::blocks::author_view))
        .route("/{id}/state", get(handlers::blocks::student_state))
}

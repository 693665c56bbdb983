//! Router assembly for the organizer service

use super::handlers::{self, AppState};
use crate::middleware::auth::require_user;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body size in bytes
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Build the application router.
///
/// Everything under `/api/organizer` requires an authenticated principal
/// except `health`; `/metrics` is operational and unauthenticated.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/organizer/chat", post(handlers::chat))
        .route("/api/organizer/suggestions", get(handlers::suggestions))
        .route("/api/organizer/daily-plan", get(handlers::daily_plan))
        .route(
            "/api/organizer/productivity-analysis",
            get(handlers::productivity_analysis),
        )
        .route("/api/organizer/motivation", get(handlers::motivation))
        .route("/api/organizer/context", get(handlers::context))
        .route("/api/organizer/test-provider", get(handlers::test_provider))
        .route_layer(middleware::from_fn(require_user));

    Router::new()
        .route("/api/organizer/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_export))
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

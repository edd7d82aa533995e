use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// The largest accepted form submission, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::root)
                .post(handlers::solve_handler)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/health", get(handlers::health_check))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

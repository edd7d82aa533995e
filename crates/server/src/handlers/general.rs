//! # General Route Handlers
//!
//! The form page itself and the health check.

use crate::page;
use axum::response::Html;

/// The handler for the root (`/`) endpoint. Renders the empty form.
pub async fn root() -> Html<String> {
    Html(page::render_page("", None))
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

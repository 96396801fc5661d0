use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::pages;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    // Oversized uploads surface as a multipart read error, so they get the
    // same JSON error shape as any other bad upload.
    let body_limit = DefaultBodyLimit::max(state.config.server.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::index))
        .route("/status", get(handlers::status))
        .route("/process_image", post(handlers::process_image))
        .route(
            "/demo",
            get(handlers::demo_form).post(handlers::demo_submit),
        )
        .route("/static/{*path}", get(pages::serve_static))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::extract::State;
use axum::response::Html;
use axum::Json;

use crate::api::pages;
use crate::api::state::AppState;
use crate::status::StatusSnapshot;

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.status.snapshot();
    Html(pages::index_page(
        &snapshot,
        &state.config.storage.archive_dir,
        state.ocr().is_available(),
    ))
}

#[derive(Debug, serde::Serialize)]
pub struct StatusData {
    #[serde(flatten)]
    pub snapshot: StatusSnapshot,
    pub ocr_available: bool,
}

/// `GET /status`
pub async fn status(State(state): State<AppState>) -> Json<StatusData> {
    Json(StatusData {
        snapshot: state.status.snapshot(),
        ocr_available: state.ocr().is_available(),
    })
}

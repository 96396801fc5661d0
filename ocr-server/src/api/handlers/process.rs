use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};

use crate::api::extractors::{RequestMeta, UploadForm};
use crate::api::response::ProcessResponse;
use crate::api::state::AppState;
use crate::error::{Result, ServerError};
use crate::pipeline::PipelineOutcome;

/// `POST /process_image`
///
/// Expects a multipart body with an `image` file field. Every failure,
/// including a missing field, is answered with a JSON error body and a 500.
pub async fn process_image(
    State(state): State<AppState>,
    meta: RequestMeta,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    state
        .status
        .record_request(meta.log_entry(format!("SRC: {}", meta.source)));

    match run(&state, &meta, multipart).await {
        Ok(outcome) => ProcessResponse::success(outcome.extracted_text).into_response(),
        Err(e) => {
            state.status.fail();
            tracing::error!(request_id = %meta.request_id, error = %e, "Image processing failed");
            e.into_response()
        }
    }
}

async fn run(
    state: &AppState,
    meta: &RequestMeta,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<PipelineOutcome> {
    let multipart = multipart.map_err(|e| ServerError::Upload(e.body_text()))?;
    let upload = UploadForm::from_multipart(multipart).await?.into_upload()?;
    state.pipeline.run(meta.request_id, upload).await
}

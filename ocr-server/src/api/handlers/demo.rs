use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::api::extractors::{RequestMeta, UploadForm};
use crate::api::pages;
use crate::api::state::AppState;
use crate::error::ServerError;

/// `GET /demo`
pub async fn demo_form() -> Html<String> {
    Html(pages::demo_form_page(None))
}

/// `POST /demo`
///
/// An invalid submission re-renders the form with a message and leaves the
/// server status alone. Pipeline failures render an error page with a 500.
pub async fn demo_submit(
    State(state): State<AppState>,
    meta: RequestMeta,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(m) => m,
        Err(_) => {
            return Html(pages::demo_form_page(Some(
                "Please submit the form with an image file.",
            )))
            .into_response()
        }
    };

    let upload = match UploadForm::from_multipart(multipart)
        .await
        .and_then(UploadForm::into_upload)
    {
        Ok(upload) => upload,
        Err(e) => {
            tracing::debug!(request_id = %meta.request_id, error = %e, "Demo form rejected");
            return Html(pages::demo_form_page(Some(&user_message(&e)))).into_response();
        }
    };

    state
        .status
        .record_request(meta.log_entry(format!("DEMO SRC: {}", meta.source)));

    match state.pipeline.run(meta.request_id, upload).await {
        Ok(outcome) => Html(pages::demo_result_page(&outcome)).into_response(),
        Err(e) => {
            state.status.fail();
            tracing::error!(request_id = %meta.request_id, error = %e, "Demo OCR failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::error_page(&e.to_string())),
            )
                .into_response()
        }
    }
}

fn user_message(err: &ServerError) -> String {
    match err {
        ServerError::Upload(msg) => msg.clone(),
        other => other.to_string(),
    }
}

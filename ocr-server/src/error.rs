use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ProcessResponse;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("Preprocessing failed: {0}")]
    Preprocess(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Every failure that reaches a handler is a 500, including a malformed or
// missing upload. OCR failures never get here; they become the sentinel text.
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ProcessResponse::error(&self)),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

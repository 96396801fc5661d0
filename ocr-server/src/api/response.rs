//! JSON body returned by `POST /process_image`.
//!
//! ```json
//! { "status": "success", "message": "Image processed successfully!", "extracted_text": "..." }
//! { "status": "error", "message": "Error processing image: ..." }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ServerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub status: ResultStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
}

impl ProcessResponse {
    pub fn success(extracted_text: String) -> Self {
        Self {
            status: ResultStatus::Success,
            message: "Image processed successfully!".to_string(),
            extracted_text: Some(extracted_text),
        }
    }

    pub fn error(err: &ServerError) -> Self {
        Self {
            status: ResultStatus::Error,
            message: format!("Error processing image: {err}"),
            extracted_text: None,
        }
    }
}

impl IntoResponse for ProcessResponse {
    fn into_response(self) -> Response {
        let status = match self.status {
            ResultStatus::Success => StatusCode::OK,
            ResultStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

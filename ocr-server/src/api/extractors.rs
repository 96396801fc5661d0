use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, Multipart};
use axum::http::request::Parts;
use uuid::Uuid;
use validator::Validate;

use crate::error::{Result, ServerError};
use crate::intake::Upload;
use crate::status::RequestLogEntry;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Who sent a request, plus a fresh id for it.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub request_id: Uuid,
    pub source: String,
    pub headers: Vec<(String, String)>,
}

impl RequestMeta {
    pub fn log_entry(&self, message: impl Into<String>) -> RequestLogEntry {
        RequestLogEntry::new(
            self.request_id,
            self.source.clone(),
            self.headers.clone(),
            message,
        )
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let source = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .or_else(|| {
                parts
                    .headers
                    .get("x-forwarded-for")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|h| h.split(',').next())
                    .map(|ip| ip.trim().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());

        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Ok(Self {
            request_id: Uuid::new_v4(),
            source,
            headers,
        })
    }
}

/// The upload form shared by `/process_image` and `/demo`.
#[derive(Debug, Default, Validate)]
pub struct UploadForm {
    /// Set only for parts sent as a file upload. A plain text part named
    /// `image` leaves this empty and fails validation.
    #[validate(required(message = "Please choose an image to upload."))]
    pub file_name: Option<String>,
    #[validate(
        required(message = "Please choose an image to upload."),
        length(min = 1, message = "The uploaded image is empty.")
    )]
    pub image: Option<Vec<u8>>,
}

impl UploadForm {
    /// Drain a multipart body, keeping the `image` file part and ignoring the
    /// rest. Only the first file part named `image` counts.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::Upload(format!("Malformed multipart body: {e}")))?
        {
            if field.name() != Some(IMAGE_FIELD) || form.image.is_some() {
                continue;
            }
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };

            form.file_name = Some(file_name);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::Upload(format!("Failed to read image: {e}")))?;
            form.image = Some(bytes.to_vec());
        }

        Ok(form)
    }

    /// Validate and convert into an [`Upload`]. The error carries a message
    /// fit for showing to the user.
    pub fn into_upload(self) -> Result<Upload> {
        if let Err(errors) = self.validate() {
            let message = errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .next()
                .unwrap_or_else(|| errors.to_string());
            return Err(ServerError::Upload(message));
        }

        Ok(Upload {
            file_name: self.file_name.unwrap_or_default(),
            bytes: self.image.unwrap_or_default(),
        })
    }
}

//! Upload intake: everything that happens to an upload before OCR.
//!
//! - [`sanitize`] turns the client filename into a path-safe token
//! - [`content_hash`] identifies the bytes
//! - [`archive`] writes the dated metadata bundle
//! - [`ScratchFile`] gives each request its own copy on disk

pub mod archive;
mod hash;
mod sanitize;
mod scratch;

use chrono::{DateTime, Local};
use serde::Serialize;

pub use archive::{archive, read_archive, ArchivedMetadata};
pub use hash::content_hash;
pub use sanitize::{sanitize, FALLBACK_TOKEN};
pub use scratch::ScratchFile;

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Metadata kept for every upload. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRecord {
    pub original_filename: String,
    pub content_hash: String,
    pub sanitized_token: String,
    pub received_at: DateTime<Local>,
}

impl UploadRecord {
    pub fn new(upload: &Upload) -> Self {
        Self {
            original_filename: upload.file_name.clone(),
            content_hash: content_hash(&upload.bytes),
            sanitized_token: sanitize(&upload.file_name),
            received_at: Local::now(),
        }
    }
}

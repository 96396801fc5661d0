//! OCR intake server.
//!
//! Accepts an uploaded image over HTTP, archives a metadata record of it,
//! binarizes it and runs Tesseract over the result.

pub mod api;
pub mod config;
pub mod error;
pub mod intake;
pub mod ocr;
pub mod pipeline;
pub mod status;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{Result, ServerError};

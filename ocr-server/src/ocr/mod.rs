//! Image preprocessing and text extraction.
//!
//! Preprocessing is a fixed greyscale → blur → Otsu binarization pass built on
//! `imageproc`. Extraction goes through Tesseract via `leptess`, English only.
//! When Tesseract cannot be loaded the provider degrades: extraction returns
//! [`EXTRACTION_FAILED`] instead of erroring.

mod preprocessing;
mod provider;

pub use preprocessing::{preprocess, preprocess_bytes, BLUR_SIGMA};
pub use provider::{OcrProvider, EXTRACTION_FAILED};

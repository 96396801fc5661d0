use std::sync::Arc;
use std::time::Duration;

use image::{GrayImage, ImageFormat};
use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{OcrConfig, OCR_LANGUAGE};
use crate::error::{Result, ServerError};

/// Returned in place of recognized text whenever the engine fails.
pub const EXTRACTION_FAILED: &str = "Error extracting text";

#[derive(Clone)]
enum OcrBackend {
    Local { tesseract: Arc<Mutex<LepTess>> },
    Unavailable { reason: String },
}

#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    timeout: Duration,
}

fn create_tesseract(tessdata_dir: Option<&str>) -> std::result::Result<LepTess, String> {
    LepTess::new(tessdata_dir, OCR_LANGUAGE).map_err(|e| e.to_string())
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Self {
        let backend = match create_tesseract(config.tessdata_dir.as_deref()) {
            Ok(lt) => {
                info!(language = OCR_LANGUAGE, "Tesseract OCR initialized");
                OcrBackend::Local {
                    tesseract: Arc::new(Mutex::new(lt)),
                }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// A provider that never reaches an engine. Every extraction yields
    /// [`EXTRACTION_FAILED`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: OcrBackend::Unavailable {
                reason: reason.into(),
            },
            timeout: Duration::from_secs(60),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            OcrBackend::Unavailable { reason } => Some(reason),
            OcrBackend::Local { .. } => None,
        }
    }

    /// Recognize the text in a preprocessed image.
    ///
    /// Never fails: any engine error, timeout or missing engine is logged and
    /// turned into [`EXTRACTION_FAILED`]. Callers should not retry.
    pub async fn extract(&self, image: &GrayImage) -> String {
        match self.try_extract(image).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Text extraction failed");
                EXTRACTION_FAILED.to_string()
            }
        }
    }

    async fn try_extract(&self, image: &GrayImage) -> Result<String> {
        let tesseract = match &self.backend {
            OcrBackend::Local { tesseract } => Arc::clone(tesseract),
            OcrBackend::Unavailable { reason } => {
                return Err(ServerError::OcrUnavailable(reason.clone()))
            }
        };

        // Tesseract takes encoded bytes, so hand it a lossless PNG.
        let mut png = Vec::new();
        image.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)?;

        let task = tokio::task::spawn_blocking(move || {
            let mut lt = tesseract.blocking_lock();
            lt.set_image_from_mem(&png)
                .map_err(|e| ServerError::Ocr(format!("Failed to set image: {e}")))?;
            lt.get_utf8_text()
                .map_err(|e| ServerError::Ocr(format!("Failed to extract text: {e}")))
        });

        let text = match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => joined.map_err(|e| ServerError::Ocr(format!("OCR task panicked: {e}")))??,
            Err(_) => {
                return Err(ServerError::Ocr(format!(
                    "OCR operation timed out after {} seconds",
                    self.timeout.as_secs()
                )))
            }
        };

        Ok(text.trim().to_string())
    }
}

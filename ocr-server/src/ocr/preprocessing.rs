use std::path::Path;

use image::{GenericImageView, GrayImage, ImageReader};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;

use crate::error::{Result, ServerError};

/// Standard deviation matching a 5x5 Gaussian kernel
/// (`0.3 * ((5 - 1) * 0.5 - 1) + 0.8`).
pub const BLUR_SIGMA: f32 = 1.1;

/// Preprocess an image file for OCR.
///
/// See [`preprocess_bytes`] for the pipeline.
pub fn preprocess(path: &Path) -> Result<GrayImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        ServerError::Preprocess(format!("Failed to read image {}: {e}", path.display()))
    })?;
    preprocess_bytes(&bytes)
}

/// Preprocess encoded image bytes for OCR.
///
/// Fixed pipeline, no knobs:
/// 1. Decode (format guessed from the content, not the filename)
/// 2. Convert to single-channel greyscale
/// 3. Gaussian blur to suppress noise
/// 4. Binarize at the Otsu level of the blurred image
///
/// The result only contains the values 0 and 255.
pub fn preprocess_bytes(bytes: &[u8]) -> Result<GrayImage> {
    if bytes.is_empty() {
        return Err(ServerError::Preprocess("Image is empty".to_string()));
    }

    let img = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ServerError::Preprocess(format!("Failed to read image: {e}")))?
        .decode()
        .map_err(|e| ServerError::Preprocess(format!("Failed to decode image: {e}")))?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ServerError::Preprocess(format!(
            "Image has no pixels: {width}x{height}"
        )));
    }

    let gray = img.to_luma8();
    let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
    let level = otsu_level(&blurred);

    tracing::debug!(width, height, otsu_level = level, "Image preprocessed");

    Ok(threshold(&blurred, level, ThresholdType::Binary))
}

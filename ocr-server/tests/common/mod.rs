#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Once;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};

use ocr_server::config::{Config, OcrConfig, ServerConfig, StorageConfig};
use ocr_server::ocr::OcrProvider;
use ocr_server::AppState;

pub const BOUNDARY: &str = "----ocr-server-test-boundary";

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn test_config(root: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes: 5 * 1024 * 1024,
        },
        storage: StorageConfig {
            archive_dir: root.join("archive"),
            scratch_dir: root.join("scratch"),
            request_log_capacity: 50,
        },
        ocr: OcrConfig {
            tessdata_dir: None,
            timeout_secs: 30,
        },
    }
}

/// State whose OCR engine is absent, so tests do not depend on a local
/// Tesseract install. Extraction always yields the failure sentinel.
pub fn test_state(root: &Path) -> AppState {
    init_test_logger();
    AppState::new(
        test_config(root),
        OcrProvider::unavailable("tests run without Tesseract"),
    )
}

/// A small two-tone PNG; `seed` varies the pixels so hashes differ.
pub fn sample_png(seed: u8) -> Vec<u8> {
    let img = GrayImage::from_fn(64, 48, |x, y| {
        if (x + y + seed as u32) % 7 < 3 {
            Luma([15])
        } else {
            Luma([235])
        }
    });
    encode_png(&img)
}

pub fn encode_png(img: &GrayImage) -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageLuma8(img.clone())
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("Failed to encode PNG");
    out
}

/// 5x7 bitmaps for the letters needed to spell "HELLO".
fn glyph(c: char) -> [&'static str; 7] {
    match c {
        'H' => ["X...X", "X...X", "X...X", "XXXXX", "X...X", "X...X", "X...X"],
        'E' => ["XXXXX", "X....", "X....", "XXXX.", "X....", "X....", "XXXXX"],
        'L' => ["X....", "X....", "X....", "X....", "X....", "X....", "XXXXX"],
        'O' => [".XXX.", "X...X", "X...X", "X...X", "X...X", "X...X", ".XXX."],
        _ => ["....."; 7],
    }
}

/// Render block capitals, black on white, large enough for Tesseract.
pub fn render_word_png(word: &str) -> Vec<u8> {
    const CELL: u32 = 10;
    const MARGIN: u32 = 40;
    let letters: Vec<char> = word.chars().collect();
    let width = MARGIN * 2 + letters.len() as u32 * 6 * CELL;
    let height = MARGIN * 2 + 7 * CELL;

    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    for (i, c) in letters.iter().enumerate() {
        let origin_x = MARGIN + i as u32 * 6 * CELL;
        for (row, bits) in glyph(*c).iter().enumerate() {
            for (col, bit) in bits.chars().enumerate() {
                if bit != 'X' {
                    continue;
                }
                for dy in 0..CELL {
                    for dx in 0..CELL {
                        img.put_pixel(
                            origin_x + col as u32 * CELL + dx,
                            MARGIN + row as u32 * CELL + dy,
                            Luma([0]),
                        );
                    }
                }
            }
        }
    }
    encode_png(&img)
}

/// Build a `multipart/form-data` body with a single file field.
pub fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a multipart body with only a text field.
pub fn multipart_text_body(field: &str, value: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{BOUNDARY}--\r\n"
    )
    .into_bytes()
}

pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("user-agent", "ocr-server-tests")
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Every `.zip` bundle under the archive root.
pub fn archived_bundles(archive_dir: &Path) -> Vec<std::path::PathBuf> {
    let mut bundles = Vec::new();
    let Ok(months) = std::fs::read_dir(archive_dir) else {
        return bundles;
    };
    for month in months.flatten() {
        if let Ok(files) = std::fs::read_dir(month.path()) {
            bundles.extend(
                files
                    .flatten()
                    .map(|f| f.path())
                    .filter(|p| p.extension().is_some_and(|e| e == "zip")),
            );
        }
    }
    bundles.sort();
    bundles
}

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a request body, in bytes.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root of the dated archive tree (`{archive_dir}/{YYYY-MM}/...zip`).
    pub archive_dir: PathBuf,
    /// Where per-request scratch copies of uploads are written.
    pub scratch_dir: PathBuf,
    /// How many entries the in-memory request log keeps.
    pub request_log_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub tessdata_dir: Option<String>,
    pub timeout_secs: u64,
}

/// Tesseract language model. The server only ships English.
pub const OCR_LANGUAGE: &str = "eng";

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("OCR_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("OCR_SERVER_PORT", 5000),
                max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            },
            storage: StorageConfig {
                archive_dir: env::var("ARCHIVE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("tmp_post")),
                scratch_dir: env::var("SCRATCH_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| env::temp_dir().join("ocr-server")),
                request_log_capacity: parse_env_or("REQUEST_LOG_CAPACITY", 100),
            },
            ocr: OcrConfig {
                tessdata_dir: env::var("TESSDATA_DIR").ok(),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

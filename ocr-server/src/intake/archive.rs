//! Dated, content-addressed metadata bundles for every upload.
//!
//! Layout: `{base}/{YYYY-MM}/{YYYY-MM-DD_HH-MM-SS}_{hash}_{token}.zip`, holding
//! two text entries, the original filename and the content hash. The image
//! itself is not stored.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::UploadRecord;
use crate::error::{Result, ServerError};

pub const ORIGINAL_FILENAME_ENTRY: &str = "original_filename.txt";
pub const HASH_ENTRY: &str = "hash_value.txt";

/// The two metadata strings recovered from a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedMetadata {
    pub original_filename: String,
    pub content_hash: String,
}

/// Archive an upload received now. This is the writer the request pipeline
/// uses; the bundle is stamped with the current local time.
pub fn archive(
    bytes: &[u8],
    original_filename: &str,
    content_hash: &str,
    token: &str,
    base_dir: &Path,
) -> Result<PathBuf> {
    let record = UploadRecord {
        original_filename: original_filename.to_string(),
        content_hash: content_hash.to_string(),
        sanitized_token: token.to_string(),
        received_at: Local::now(),
    };
    write_record(&record, bytes.len(), base_dir)
}

/// Path a record will be written to under `base_dir`.
pub fn bundle_path(record: &UploadRecord, base_dir: &Path) -> PathBuf {
    let month = record.received_at.format("%Y-%m").to_string();
    let file_name = format!(
        "{}_{}_{}.zip",
        record.received_at.format("%Y-%m-%d_%H-%M-%S"),
        record.content_hash,
        record.sanitized_token
    );
    base_dir.join(month).join(file_name)
}

/// Write the bundle for `record`. Byte-identical uploads with the same name
/// landing in the same second map to the same path, and the rewrite is
/// idempotent.
fn write_record(record: &UploadRecord, upload_len: usize, base_dir: &Path) -> Result<PathBuf> {
    let path = bundle_path(record, base_dir);
    let month_dir = path
        .parent()
        .ok_or_else(|| ServerError::Archive(format!("no parent for {}", path.display())))?;

    fs::create_dir_all(month_dir).map_err(|e| {
        ServerError::Archive(format!("cannot create {}: {e}", month_dir.display()))
    })?;

    let file = File::create(&path)
        .map_err(|e| ServerError::Archive(format!("cannot create {}: {e}", path.display())))?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(ORIGINAL_FILENAME_ENTRY, options)?;
    zip.write_all(record.original_filename.as_bytes())?;
    zip.start_file(HASH_ENTRY, options)?;
    zip.write_all(record.content_hash.as_bytes())?;
    zip.finish()?;

    tracing::debug!(
        path = %path.display(),
        hash = %record.content_hash,
        upload_len,
        "Upload archived"
    );

    Ok(path)
}

/// Read both metadata entries back out of a bundle.
pub fn read_archive(path: &Path) -> Result<ArchivedMetadata> {
    let mut archive = ZipArchive::new(File::open(path)?)?;

    let original_filename = read_entry(&mut archive, ORIGINAL_FILENAME_ENTRY)?;
    let content_hash = read_entry(&mut archive, HASH_ENTRY)?;

    Ok(ArchivedMetadata {
        original_filename,
        content_hash,
    })
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Result<String> {
    let mut entry = archive.by_name(name)?;
    let mut contents = String::new();
    entry.read_to_string(&mut contents)?;
    Ok(contents)
}

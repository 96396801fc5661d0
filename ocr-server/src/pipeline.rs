use std::path::PathBuf;
use std::sync::Arc;

use image::GrayImage;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{Result, ServerError};
use crate::intake::{self, ScratchFile, Upload, UploadRecord};
use crate::ocr::{preprocess, OcrProvider};
use crate::status::ServerStatus;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub request_id: Uuid,
    pub record: UploadRecord,
    /// `None` when archiving failed; the OCR result is still returned.
    pub archive_path: Option<PathBuf>,
    pub extracted_text: String,
}

/// Upload → archive → scratch file → preprocess → OCR, shared by the JSON
/// endpoint and the demo page.
#[derive(Clone)]
pub struct OcrPipeline {
    ocr: OcrProvider,
    status: Arc<ServerStatus>,
    storage: StorageConfig,
}

impl OcrPipeline {
    pub fn new(ocr: OcrProvider, status: Arc<ServerStatus>, storage: StorageConfig) -> Self {
        Self {
            ocr,
            status,
            storage,
        }
    }

    pub fn ocr(&self) -> &OcrProvider {
        &self.ocr
    }

    /// Run one upload through the pipeline.
    ///
    /// Moves the status to `processing`, and on success bumps the processed
    /// counter and moves it to `ready`. Failures are returned untouched; the
    /// handler boundary is responsible for flagging `error`.
    pub async fn run(&self, request_id: Uuid, upload: Upload) -> Result<PipelineOutcome> {
        self.status.begin_processing();

        let storage = self.storage.clone();
        let (record, archive_path, image) =
            tokio::task::spawn_blocking(move || persist_and_preprocess(request_id, upload, &storage))
                .await
                .map_err(|e| ServerError::Internal(format!("preprocessing task failed: {e}")))??;

        let extracted_text = self.ocr.extract(&image).await;
        let processed = self.status.complete();

        tracing::info!(
            %request_id,
            hash = %record.content_hash,
            token = %record.sanitized_token,
            archived = archive_path.is_some(),
            chars = extracted_text.len(),
            processed,
            "Image processed"
        );

        Ok(PipelineOutcome {
            request_id,
            record,
            archive_path,
            extracted_text,
        })
    }
}

fn persist_and_preprocess(
    request_id: Uuid,
    upload: Upload,
    storage: &StorageConfig,
) -> Result<(UploadRecord, Option<PathBuf>, GrayImage)> {
    let record = UploadRecord::new(&upload);

    let archive_path = match intake::archive(
        &upload.bytes,
        &record.original_filename,
        &record.content_hash,
        &record.sanitized_token,
        &storage.archive_dir,
    ) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(%request_id, error = %e, "Archiving upload failed, continuing without it");
            None
        }
    };

    let scratch = ScratchFile::create(&storage.scratch_dir, request_id, &upload.bytes)?;
    let image = preprocess(scratch.path())?;

    Ok((record, archive_path, image))
}

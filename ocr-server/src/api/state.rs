use std::sync::Arc;

use crate::config::Config;
use crate::ocr::OcrProvider;
use crate::pipeline::OcrPipeline;
use crate::status::ServerStatus;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub status: Arc<ServerStatus>,
    pub pipeline: OcrPipeline,
}

impl AppState {
    pub fn new(config: Config, ocr: OcrProvider) -> Self {
        let config = Arc::new(config);
        let status = Arc::new(ServerStatus::new(config.storage.request_log_capacity));
        let pipeline = OcrPipeline::new(ocr, status.clone(), config.storage.clone());

        Self {
            config,
            status,
            pipeline,
        }
    }

    pub fn ocr(&self) -> &OcrProvider {
        self.pipeline.ocr()
    }
}

mod extractors;
pub mod handlers;
mod pages;
pub mod response;
mod routes;
mod state;

pub use extractors::{RequestMeta, UploadForm};
pub use routes::create_router;
pub use state::AppState;

mod demo;
mod index;
mod process;

pub use demo::{demo_form, demo_submit};
pub use index::{index, status};
pub use process::process_image;

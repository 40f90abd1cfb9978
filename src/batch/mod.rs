pub mod core;
pub mod error;
pub mod metadata;

pub use core::{
    BatchEvent, BatchOptions, RunSummary, SUPPORTED_EXTENSIONS, default_directory_output,
    default_single_output, is_supported_image, run, run_with_events,
};
pub use error::BatchError;
pub use metadata::capture_date_text;

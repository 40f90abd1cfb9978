pub mod core;
pub mod error;
pub mod types;

pub use core::TemplateManager;
pub use error::TemplateError;
pub use types::{TemplateStoreConfig, TemplateSummary, WatermarkTemplate};

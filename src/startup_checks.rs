use crate::Config;
use crate::compositor::font;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Failed to create template store directory: {0}")]
    StoreDirectoryCreationFailed(#[from] std::io::Error),

    #[error("Configured font is not usable: {0}")]
    FontMissing(String),

    #[error("Configured watermark image does not exist: {0}")]
    WatermarkImageMissing(String),
}

impl StartupCheckError {
    /// Store directory failures block template commands; everything else
    /// degrades at render time.
    pub fn is_critical(&self) -> bool {
        matches!(self, StartupCheckError::StoreDirectoryCreationFailed(_))
    }
}

pub fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    // Template store parent must exist before any mutation rewrites the file.
    if let Some(parent) = config.templates.store_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!(
                "Template store directory does not exist, creating: {:?}",
                parent
            );
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!(
                    "Failed to create template store directory {:?}: {}",
                    parent, e
                );
                errors.push(StartupCheckError::StoreDirectoryCreationFailed(e));
            }
        }
    }

    match &config.fonts.font_path {
        Some(path) if path.is_file() => info!("Configured font found: {:?}", path),
        Some(path) => {
            warn!("Configured font does not exist: {:?}", path);
            errors.push(StartupCheckError::FontMissing(path.display().to_string()));
        }
        None => {
            if font::resolve_font(None).is_some() {
                info!("System font available for text watermarks");
            } else {
                warn!("No system font found, text watermarks will be skipped");
            }
        }
    }

    if let Some(image) = &config.watermark.watermark_image {
        if image.is_file() {
            info!("Watermark image found: {:?}", image);
        } else {
            warn!("Configured watermark image does not exist: {:?}", image);
            errors.push(StartupCheckError::WatermarkImageMissing(
                image.display().to_string(),
            ));
        }
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        warn!("Startup checks finished with {} findings", errors.len());
        Err(errors)
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod batch;
pub mod compositor;
pub mod interactive;
pub mod startup_checks;
pub mod templates;

pub use compositor::{OutputFormat, Position, Resolved, WatermarkConfig, compose};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    /// Defaults for a run; CLI flags and templates override per invocation.
    pub watermark: WatermarkConfig,
    pub fonts: FontConfig,
    pub templates: templates::TemplateStoreConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FontConfig {
    /// Preferred font file; common system locations are searched when unset.
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to a directory's name to form the default output directory.
    pub directory_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            watermark: WatermarkConfig::default(),
            fonts: FontConfig::default(),
            templates: templates::TemplateStoreConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "sukashi".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory_suffix: "_watermark".to_string(),
        }
    }
}

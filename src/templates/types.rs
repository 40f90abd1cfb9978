use crate::compositor::WatermarkConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named watermark configuration as stored in the JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkTemplate {
    pub name: String,
    pub config: WatermarkConfig,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl WatermarkTemplate {
    /// One-line digest of the settings, for listings.
    pub fn config_summary(&self) -> String {
        let c = &self.config;
        let mut parts = Vec::new();
        if let Some(text) = c.effective_text() {
            parts.push(format!("text \"{}\"", text));
        }
        if c.watermark_image.is_some() {
            parts.push("image watermark".to_string());
        }
        parts.push(format!("font {}px", c.font_size));
        parts.push(format!(
            "color {},{},{}",
            c.font_color[0], c.font_color[1], c.font_color[2]
        ));
        parts.push(format!("position {}", c.position));
        parts.push(format!("opacity {}%", c.opacity));
        parts.push(format!("format {}", c.output_format.name()));
        parts.join(" | ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateStoreConfig {
    pub store_path: PathBuf,
}

impl Default for TemplateStoreConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("templates.json"),
        }
    }
}

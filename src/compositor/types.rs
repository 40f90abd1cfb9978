use crate::compositor::position::Position;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
        }
    }

    /// Strict parse for CLI input. Unknown formats are a usage error, not a
    /// degradable setting.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub width: u32,
    pub color: [u8; 3],
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 2,
            color: [0, 0, 0],
        }
    }
}

/// Everything one render needs. Cloned per file in batch runs so per-file
/// adjustments (resolved text) never leak between items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Watermark text. Empty or whitespace-only is treated as absent.
    pub text: Option<String>,
    /// Path to an image watermark, composited after the text layer.
    pub watermark_image: Option<PathBuf>,
    pub font_size: u32,
    pub font_color: [u8; 3],
    /// 0-100. Scales text alpha directly and multiplies the image layer's
    /// existing alpha channel.
    pub opacity: u8,
    pub position: Position,
    /// Margin from the horizontal edge named by `position`, in pixels.
    pub offset_x: u32,
    /// Margin from the vertical edge named by `position`, in pixels.
    pub offset_y: u32,
    /// Counter-clockwise degrees, -180..=180.
    pub rotation_degrees: i32,
    /// Scale factor applied to the image watermark before placement.
    pub image_scale: f32,
    pub stroke: Option<StrokeStyle>,
    pub shadow: bool,
    /// Explicit font file. When unset, a list of common system locations is
    /// searched.
    pub font_path: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub jpeg_quality: u8,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: None,
            watermark_image: None,
            font_size: 30,
            font_color: [255, 255, 255],
            opacity: 80,
            position: Position::BottomRight,
            offset_x: 20,
            offset_y: 20,
            rotation_degrees: 0,
            image_scale: 1.0,
            stroke: None,
            shadow: false,
            font_path: None,
            output_format: OutputFormat::Jpeg,
            jpeg_quality: 95,
        }
    }
}

impl WatermarkConfig {
    /// Range checks shared by the CLI boundary and the template store.
    pub fn validate(&self) -> Result<(), String> {
        if self.font_size == 0 || self.font_size > 200 {
            return Err(format!(
                "font_size must be between 1 and 200, got {}",
                self.font_size
            ));
        }
        if self.opacity > 100 {
            return Err(format!("opacity must be between 0 and 100, got {}", self.opacity));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            ));
        }
        if !self.image_scale.is_finite() || self.image_scale <= 0.0 {
            return Err(format!(
                "image_scale must be a positive number, got {}",
                self.image_scale
            ));
        }
        if self.rotation_degrees < -180 || self.rotation_degrees > 180 {
            return Err(format!(
                "rotation_degrees must be between -180 and 180, got {}",
                self.rotation_degrees
            ));
        }
        if let Some(stroke) = &self.stroke {
            if stroke.width == 0 || stroke.width > 20 {
                return Err(format!(
                    "stroke width must be between 1 and 20, got {}",
                    stroke.width
                ));
            }
        }
        Ok(())
    }

    /// Text to render, with empty strings filtered out.
    pub fn effective_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Alpha byte for the text layer at this opacity.
    pub fn text_alpha(&self) -> u8 {
        (255.0 * f32::from(self.opacity) / 100.0).round() as u8
    }
}

/// Outcome of lenient resolution: the value to use, plus a record of the
/// substitution when the requested input could not be honored. Callers log
/// the fallback; tests assert on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    value: T,
    fallback: Option<Fallback>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fallback {
    /// What was asked for, verbatim.
    pub requested: String,
    pub reason: String,
}

impl<T> Resolved<T> {
    pub fn exact(value: T) -> Self {
        Self {
            value,
            fallback: None,
        }
    }

    pub fn defaulted(value: T, requested: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value,
            fallback: Some(Fallback {
                requested: requested.into(),
                reason: reason.into(),
            }),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn fallback(&self) -> Option<&Fallback> {
        self.fallback.as_ref()
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

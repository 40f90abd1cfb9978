use crate::compositor::overlay::{paste_layer, render_image_layer};
use crate::compositor::text::render_text_layer;
use crate::compositor::types::{OutputFormat, WatermarkConfig};
use crate::compositor::font;
use image::DynamicImage;
use tracing::{debug, warn};

/// Renders every configured watermark layer over `source` and returns a new
/// image in the pixel mode required by `config.output_format` (RGB for JPEG,
/// RGBA for PNG). The source is never mutated and nothing touches disk; the
/// same inputs always produce the same output. Layer problems (no usable
/// font, unreadable watermark image) degrade to a logged warning.
pub fn compose(source: &DynamicImage, config: &WatermarkConfig) -> DynamicImage {
    let mut working = source.to_rgba8();
    let canvas = working.dimensions();

    if let Some(text) = config.effective_text() {
        match font::resolve_font(config.font_path.as_deref()) {
            Some(loaded) => {
                let (layer, anchor) = render_text_layer(canvas, text, &loaded, config);
                paste_layer(&mut working, &layer, (0, 0));
                debug!("Text watermark {:?} anchored at {:?}", text, anchor);
            }
            None => warn!("No usable font found, skipping text watermark"),
        }
    }

    if let Some((layer, anchor)) = render_image_layer(canvas, config) {
        paste_layer(&mut working, &layer, anchor);
        debug!("Image watermark anchored at {:?}", anchor);
    }

    match config.output_format {
        // JPEG cannot carry alpha; flatten the working buffer to RGB.
        OutputFormat::Jpeg => {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(working).to_rgb8())
        }
        OutputFormat::Png => DynamicImage::ImageRgba8(working),
    }
}

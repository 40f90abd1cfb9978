// Watermark compositor - pure image-in, image-out rendering of text and
// image watermark layers. Encoding lives in `formats`; nothing here writes
// to disk except reading the watermark source image itself.
pub mod color;
pub mod error;
pub mod font;
pub mod formats;
pub mod position;
pub mod types;

mod compose;
mod overlay;
mod text;

pub use compose::compose;
pub use error::CompositorError;
pub use position::Position;
pub use types::{Fallback, OutputFormat, Resolved, StrokeStyle, WatermarkConfig};

#[cfg(test)]
mod tests {
    mod color_tests;
    mod compose_tests;
    mod overlay_tests;
    mod position_tests;
    mod text_tests;
}

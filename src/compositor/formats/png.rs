use image::{DynamicImage, codecs::png::PngEncoder};
use std::path::Path;

use crate::compositor::CompositorError;

/// Writes a PNG, keeping whatever alpha the composite carries.
pub fn save(image: &DynamicImage, path: &Path) -> Result<(), CompositorError> {
    let output = std::fs::File::create(path)?;
    let encoder = PngEncoder::new(output);
    image.write_with_encoder(encoder)?;
    Ok(())
}

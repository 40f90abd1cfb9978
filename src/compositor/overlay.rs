use crate::compositor::types::WatermarkConfig;
use image::imageops::FilterType;
use image::{Rgba, RgbaImage, imageops};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::warn;

/// Prepares the image watermark layer: decode, scale with Lanczos3, multiply
/// the alpha channel by the configured opacity, then rotate with expansion.
/// Returns the layer and its paste anchor, or `None` when the watermark file
/// is missing or undecodable (the render continues without it).
pub(crate) fn render_image_layer(
    canvas: (u32, u32),
    config: &WatermarkConfig,
) -> Option<(RgbaImage, (i64, i64))> {
    let path = config.watermark_image.as_ref()?;
    let watermark = match image::open(path) {
        Ok(img) => img,
        Err(e) => {
            warn!("Cannot open watermark image {:?}: {}, skipping layer", path, e);
            return None;
        }
    };

    let scaled_w = ((watermark.width() as f32 * config.image_scale) as u32).max(1);
    let scaled_h = ((watermark.height() as f32 * config.image_scale) as u32).max(1);
    let mut layer = watermark
        .resize_exact(scaled_w, scaled_h, FilterType::Lanczos3)
        .to_rgba8();

    apply_opacity(&mut layer, config.opacity);

    // Anchor from the scaled, pre-rotation size: rotation grows the canvas
    // around the placement rather than moving it.
    let anchor = config.position.anchor(
        canvas,
        layer.dimensions(),
        (config.offset_x, config.offset_y),
    );

    if config.rotation_degrees != 0 {
        layer = rotate_expanded(&layer, config.rotation_degrees);
    }

    Some((layer, anchor))
}

/// Multiplies the existing alpha channel, so transparency already present in
/// the watermark survives the opacity setting.
pub(crate) fn apply_opacity(layer: &mut RgbaImage, opacity: u8) {
    for pixel in layer.pixels_mut() {
        pixel[3] = (u16::from(pixel[3]) * u16::from(opacity) / 100) as u8;
    }
}

/// Rotates counter-clockwise by `degrees` onto a canvas sized to the rotated
/// bounding box, keeping corners instead of clipping them.
pub(crate) fn rotate_expanded(layer: &RgbaImage, degrees: i32) -> RgbaImage {
    let theta = -(degrees as f32).to_radians();
    let (w, h) = (layer.width() as f32, layer.height() as f32);
    let expanded_w = ((w * theta.cos().abs() + h * theta.sin().abs()).ceil() as u32).max(1);
    let expanded_h = ((w * theta.sin().abs() + h * theta.cos().abs()).ceil() as u32).max(1);

    let projection = Projection::translate(expanded_w as f32 / 2.0, expanded_h as f32 / 2.0)
        * Projection::rotate(theta)
        * Projection::translate(-w / 2.0, -h / 2.0);

    let mut expanded = RgbaImage::new(expanded_w, expanded_h);
    warp_into(
        layer,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
        &mut expanded,
    );
    expanded
}

/// Alpha-blended paste of a prepared layer at a signed anchor. Layers larger
/// than the canvas or anchored outside it are clipped by the blend itself.
pub(crate) fn paste_layer(working: &mut RgbaImage, layer: &RgbaImage, anchor: (i64, i64)) {
    imageops::overlay(working, layer, anchor.0, anchor.1);
}

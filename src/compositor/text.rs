use crate::compositor::font::LoadedFont;
use crate::compositor::types::WatermarkConfig;
use ab_glyph::PxScale;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

/// Renders the text watermark onto a transparent layer the size of the
/// target image. The layer is drawn in passes (stroke, shadow, fill) at the
/// anchored location and then rotated in place about the layer center, so
/// the layer can be composited at the origin. Also returns the text anchor.
pub(crate) fn render_text_layer(
    canvas: (u32, u32),
    text: &str,
    loaded: &LoadedFont,
    config: &WatermarkConfig,
) -> (RgbaImage, (i64, i64)) {
    let scale = PxScale::from(config.font_size as f32);
    let (text_width, text_height) = text_size(scale, &loaded.font, text);
    let (x, y) = config.position.anchor(
        canvas,
        (text_width, text_height),
        (config.offset_x, config.offset_y),
    );

    let mut layer = RgbaImage::new(canvas.0, canvas.1);
    let alpha = config.text_alpha();

    if let Some(stroke) = &config.stroke {
        let stroke_color = Rgba([stroke.color[0], stroke.color[1], stroke.color[2], alpha]);
        let w = i64::from(stroke.width);
        for (dx, dy) in [
            (-w, -w),
            (-w, 0),
            (-w, w),
            (0, -w),
            (0, w),
            (w, -w),
            (w, 0),
            (w, w),
        ] {
            draw_text_mut(
                &mut layer,
                stroke_color,
                (x + dx) as i32,
                (y + dy) as i32,
                scale,
                &loaded.font,
                text,
            );
        }
    }

    if config.shadow {
        let shadow_color = Rgba([0, 0, 0, alpha / 2]);
        draw_text_mut(
            &mut layer,
            shadow_color,
            (x + 2) as i32,
            (y + 2) as i32,
            scale,
            &loaded.font,
            text,
        );
    }

    let fill = Rgba([
        config.font_color[0],
        config.font_color[1],
        config.font_color[2],
        alpha,
    ]);
    draw_text_mut(&mut layer, fill, x as i32, y as i32, scale, &loaded.font, text);

    if config.rotation_degrees != 0 {
        // Positive degrees rotate counter-clockwise; imageproc's convention
        // is clockwise, hence the sign flip. The layer keeps its size, so
        // text near a corner may clip when rotated.
        let theta = -(config.rotation_degrees as f32).to_radians();
        layer = rotate_about_center(&layer, theta, Interpolation::Bilinear, Rgba([0, 0, 0, 0]));
    }

    (layer, (x, y))
}

use crate::compositor::overlay::{apply_opacity, render_image_layer, rotate_expanded};
use crate::compositor::position::Position;
use crate::compositor::types::WatermarkConfig;
use image::{ImageBuffer, Rgba, RgbaImage};
use tempfile::TempDir;

fn solid(width: u32, height: u32, pixel: [u8; 4]) -> RgbaImage {
    ImageBuffer::from_pixel(width, height, Rgba(pixel))
}

/// Writes a solid watermark PNG and returns a config pointing at it.
fn watermark_fixture(dir: &TempDir, width: u32, height: u32) -> WatermarkConfig {
    let path = dir.path().join("mark.png");
    solid(width, height, [255, 0, 0, 255]).save(&path).unwrap();
    WatermarkConfig {
        watermark_image: Some(path),
        opacity: 100,
        ..WatermarkConfig::default()
    }
}

#[test]
fn test_apply_opacity_multiplies_existing_alpha() {
    let mut layer = solid(2, 1, [10, 20, 30, 255]);
    layer.put_pixel(1, 0, Rgba([10, 20, 30, 128]));

    apply_opacity(&mut layer, 50);

    assert_eq!(layer.get_pixel(0, 0)[3], 127);
    assert_eq!(layer.get_pixel(1, 0)[3], 64);
    // Color channels stay untouched.
    assert_eq!(&layer.get_pixel(0, 0).0[..3], &[10, 20, 30]);
}

#[test]
fn test_apply_opacity_extremes() {
    let mut transparent = solid(3, 3, [1, 2, 3, 200]);
    apply_opacity(&mut transparent, 0);
    assert!(transparent.pixels().all(|p| p[3] == 0));

    let mut unchanged = solid(3, 3, [1, 2, 3, 200]);
    apply_opacity(&mut unchanged, 100);
    assert!(unchanged.pixels().all(|p| p[3] == 200));
}

#[test]
fn test_rotate_expanded_grows_to_the_rotated_bounding_box() {
    let layer = solid(200, 100, [255, 255, 255, 255]);

    // 45 degrees: both sides become ceil((200 + 100) * cos 45) = 213.
    assert_eq!(rotate_expanded(&layer, 45).dimensions(), (213, 213));

    // 30 degrees: ceil(200 cos 30 + 100 sin 30) x ceil(200 sin 30 + 100 cos 30).
    assert_eq!(rotate_expanded(&layer, 30).dimensions(), (224, 187));
}

#[test]
fn test_rotate_expanded_keeps_corners_and_clears_background() {
    let layer = solid(200, 100, [255, 255, 255, 255]);
    let rotated = rotate_expanded(&layer, 45);

    // The expanded canvas corners lie outside the rotated rectangle.
    assert_eq!(rotated.get_pixel(0, 0)[3], 0);
    assert_eq!(rotated.get_pixel(212, 212)[3], 0);

    // The center is inside it.
    assert_eq!(rotated.get_pixel(106, 106)[3], 255);
}

#[test]
fn test_rotation_direction_is_counter_clockwise() {
    // A wide white bar rotated +90 becomes a tall bar; the original's right
    // edge must end up at the top.
    let mut layer = solid(20, 4, [0, 0, 0, 0]);
    for x in 16..20 {
        for y in 0..4 {
            layer.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }
    let rotated = rotate_expanded(&layer, 90);

    let (w, h) = rotated.dimensions();
    assert!(w <= 6 && h >= 20, "expected a tall result, got {w}x{h}");

    let top_opaque: usize = (0..w)
        .flat_map(|x| (0..h / 2).map(move |y| (x, y)))
        .filter(|&(x, y)| rotated.get_pixel(x, y)[3] > 128)
        .count();
    let bottom_opaque: usize = (0..w)
        .flat_map(|x| (h / 2..h).map(move |y| (x, y)))
        .filter(|&(x, y)| rotated.get_pixel(x, y)[3] > 128)
        .count();
    assert!(
        top_opaque > bottom_opaque,
        "marked end should rotate to the top ({top_opaque} vs {bottom_opaque})"
    );
}

#[test]
fn test_render_image_layer_scales_and_anchors() {
    let dir = TempDir::new().unwrap();
    let config = WatermarkConfig {
        image_scale: 0.5,
        ..watermark_fixture(&dir, 100, 60)
    };

    let (layer, anchor) = render_image_layer((800, 600), &config).expect("layer expected");
    assert_eq!(layer.dimensions(), (50, 30));
    // Default bottom-right with 20px margins.
    assert_eq!(anchor, (730, 550));
}

#[test]
fn test_render_image_layer_never_scales_to_zero() {
    let dir = TempDir::new().unwrap();
    let config = WatermarkConfig {
        image_scale: 0.01,
        ..watermark_fixture(&dir, 10, 10)
    };

    let (layer, _) = render_image_layer((800, 600), &config).expect("layer expected");
    assert_eq!(layer.dimensions(), (1, 1));
}

#[test]
fn test_render_image_layer_applies_opacity() {
    let dir = TempDir::new().unwrap();
    let config = WatermarkConfig {
        opacity: 50,
        ..watermark_fixture(&dir, 10, 10)
    };

    let (layer, _) = render_image_layer((800, 600), &config).expect("layer expected");
    assert!(layer.pixels().all(|p| p[3] == 127));
}

#[test]
fn test_render_image_layer_missing_file_is_skipped() {
    let config = WatermarkConfig {
        watermark_image: Some("/no/such/watermark.png".into()),
        ..WatermarkConfig::default()
    };
    assert!(render_image_layer((800, 600), &config).is_none());
}

#[test]
fn test_render_image_layer_without_image_configured() {
    let config = WatermarkConfig::default();
    assert!(config.watermark_image.is_none());
    assert!(render_image_layer((800, 600), &config).is_none());
}

#[test]
fn test_anchor_uses_pre_rotation_size() {
    let dir = TempDir::new().unwrap();
    let config = WatermarkConfig {
        rotation_degrees: 45,
        position: Position::TopLeft,
        offset_x: 0,
        offset_y: 0,
        ..watermark_fixture(&dir, 100, 60)
    };

    let (layer, anchor) = render_image_layer((800, 600), &config).expect("layer expected");
    // The layer grew for the rotation but the anchor stayed at the
    // unrotated placement.
    assert!(layer.width() > 100 && layer.height() > 60);
    assert_eq!(anchor, (0, 0));
}

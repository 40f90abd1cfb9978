use image::{DynamicImage, ImageEncoder, codecs::jpeg::JpegEncoder};
use std::path::Path;
use tracing::debug;

use crate::compositor::CompositorError;

/// Pulls the ICC profile out of a JPEG's APP2 segment, if one is present.
/// Returns the raw profile bytes without the `ICC_PROFILE` header.
pub fn extract_icc_profile(path: &Path) -> Option<Vec<u8>> {
    let data = std::fs::read(path).ok()?;
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        // Padding and standalone markers carry no length field.
        if marker == 0xFF || marker == 0x01 || (0xD0..=0xD8).contains(&marker) {
            pos += 2;
            continue;
        }
        // Start of scan or end of image: no metadata segments follow.
        if marker == 0xDA || marker == 0xD9 {
            break;
        }
        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if length < 2 || pos + 2 + length > data.len() {
            break;
        }
        if marker == 0xE2 {
            let segment = &data[pos + 4..pos + 2 + length];
            if let Some(payload) = segment.strip_prefix(b"ICC_PROFILE\0") {
                // Two chunk sequence bytes precede the profile data.
                if payload.len() > 2 {
                    debug!("Found ICC profile in {:?}: {} bytes", path, payload.len() - 2);
                    return Some(payload[2..].to_vec());
                }
            }
        }
        pos += 2 + length;
    }

    None
}

/// Writes a JPEG at the given quality, re-embedding an ICC profile when one
/// was carried over from the source. A rejected profile falls back to a
/// plain encode instead of failing the file.
pub fn save(
    image: &DynamicImage,
    path: &Path,
    quality: u8,
    icc_profile: Option<&[u8]>,
) -> Result<(), CompositorError> {
    // JPEG carries no alpha channel.
    let rgb_image = image.to_rgb8();
    let output = std::fs::File::create(path)?;

    if let Some(profile) = icc_profile {
        let mut encoder = JpegEncoder::new_with_quality(output, quality);
        match encoder.set_icc_profile(profile.to_vec()) {
            Ok(()) => {
                encoder.write_image(
                    &rgb_image,
                    rgb_image.width(),
                    rgb_image.height(),
                    image::ExtendedColorType::Rgb8,
                )?;
                debug!("JPEG written with ICC profile: {} bytes", profile.len());
                return Ok(());
            }
            Err(e) => {
                debug!(
                    "JPEG encoder rejected ICC profile ({}), writing without it",
                    e
                );
            }
        }
        let encoder = JpegEncoder::new_with_quality(std::fs::File::create(path)?, quality);
        encoder.write_image(
            &rgb_image,
            rgb_image.width(),
            rgb_image.height(),
            image::ExtendedColorType::Rgb8,
        )?;
    } else {
        let encoder = JpegEncoder::new_with_quality(output, quality);
        encoder.write_image(
            &rgb_image,
            rgb_image.width(),
            rgb_image.height(),
            image::ExtendedColorType::Rgb8,
        )?;
    }

    Ok(())
}

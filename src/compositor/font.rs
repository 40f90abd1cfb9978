use ab_glyph::FontVec;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Locations tried when no explicit font is configured.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A parsed font plus where it came from, for logging.
pub struct LoadedFont {
    pub font: FontVec,
    pub path: PathBuf,
}

/// Resolves a usable font: the explicit path first when given, then common
/// system locations. `None` means text rendering must be skipped.
pub fn resolve_font(explicit: Option<&Path>) -> Option<LoadedFont> {
    if let Some(path) = explicit {
        match load_font_file(path) {
            Some(loaded) => return Some(loaded),
            None => warn!(
                "Configured font {:?} is unusable, searching system locations",
                path
            ),
        }
    }
    SYSTEM_FONT_PATHS
        .iter()
        .find_map(|path| load_font_file(Path::new(path)))
}

fn load_font_file(path: &Path) -> Option<LoadedFont> {
    if !path.is_file() {
        return None;
    }
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to read font {:?}: {}", path, e);
            return None;
        }
    };
    match FontVec::try_from_vec(data) {
        Ok(font) => {
            debug!("Loaded font from {:?}", path);
            Some(LoadedFont {
                font,
                path: path.to_path_buf(),
            })
        }
        Err(_) => {
            warn!("Failed to parse font file {:?}", path);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_explicit_font_falls_through() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.ttf");
        // Either a system font is found or nothing is, but the bogus path
        // itself must never be the answer.
        if let Some(loaded) = resolve_font(Some(&missing)) {
            assert_ne!(loaded.path, missing);
        }
    }

    #[test]
    fn test_garbage_font_file_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let bogus = dir.path().join("garbage.ttf");
        let mut f = std::fs::File::create(&bogus).unwrap();
        f.write_all(b"this is not a font").unwrap();

        if let Some(loaded) = resolve_font(Some(&bogus)) {
            assert_ne!(loaded.path, bogus);
        }
    }
}

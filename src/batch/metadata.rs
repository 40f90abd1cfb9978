use crate::compositor::Resolved;
use chrono::{DateTime, Local, NaiveDateTime};
use std::path::Path;
use tracing::{debug, trace};

/// Text stamped onto a file when none was configured: the EXIF capture date
/// when present and parseable, otherwise the file's modification time.
/// Rendered `YYYY-MM-DD` either way; the mtime case carries a fallback
/// diagnostic.
pub fn capture_date_text(path: &Path) -> Resolved<String> {
    if let Some(date) = exif_capture_date(path) {
        return Resolved::exact(date);
    }

    let requested = format!("EXIF capture date of {}", path.display());
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(mtime) => {
            let formatted = DateTime::<Local>::from(mtime).format("%Y-%m-%d").to_string();
            Resolved::defaulted(formatted, requested, "no usable EXIF date, using file mtime")
        }
        Err(e) => Resolved::defaulted(
            Local::now().format("%Y-%m-%d").to_string(),
            requested,
            format!("no EXIF date and mtime unreadable ({})", e),
        ),
    }
}

fn exif_capture_date(path: &Path) -> Option<String> {
    let exif = match rexif::parse_file(path) {
        Ok(exif) => exif,
        Err(e) => {
            trace!("No EXIF data for {}: {}", path.display(), e);
            return None;
        }
    };

    // Try different date tags in order of preference.
    let date_fields = [
        rexif::ExifTag::DateTimeOriginal,
        rexif::ExifTag::DateTimeDigitized,
        rexif::ExifTag::DateTime,
    ];

    for field in &date_fields {
        if let Some(entry) = exif.entries.iter().find(|e| e.tag == *field) {
            // EXIF datetime format: "2005:07:30 07:22:46"
            let raw = entry.value_more_readable.trim();
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y:%m:%d %H:%M:%S") {
                debug!("Capture date for {} from {:?}: {}", path.display(), field, raw);
                return Some(parsed.format("%Y-%m-%d").to_string());
            }
        }
    }

    None
}

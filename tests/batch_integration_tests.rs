use image::{DynamicImage, ImageBuffer, Rgb};
use std::path::Path;
use sukashi::batch::{self, BatchError, BatchEvent, BatchOptions};
use sukashi::{OutputFormat, WatermarkConfig};
use tempfile::TempDir;

fn write_photo(path: &Path) {
    ImageBuffer::from_pixel(64, 48, Rgb([40u8, 90, 200]))
        .save(path)
        .unwrap();
}

/// Config that renders without needing a font on the test machine: text
/// rendering degrades gracefully, so runs still count as successes.
fn png_config() -> WatermarkConfig {
    WatermarkConfig {
        text: Some("integration".to_string()),
        output_format: OutputFormat::Png,
        ..WatermarkConfig::default()
    }
}

#[test]
fn test_directory_run_counts_corrupt_files_without_aborting() {
    let temp_dir = TempDir::new().unwrap();
    let photos = temp_dir.path().join("photos");
    std::fs::create_dir(&photos).unwrap();

    write_photo(&photos.join("a.png"));
    write_photo(&photos.join("b.jpg"));
    write_photo(&photos.join("c.png"));
    std::fs::write(photos.join("corrupt.jpg"), b"this is not an image").unwrap();

    let summary = batch::run(&photos, &png_config(), &BatchOptions::default()).unwrap();
    assert_eq!((summary.succeeded, summary.total), (3, 4));
    assert!(!summary.all_succeeded());

    let out_dir = photos.join("photos_watermark");
    assert!(out_dir.join("a.png").exists());
    // Output extension follows the configured format, not the source.
    assert!(out_dir.join("b.png").exists());
    assert!(out_dir.join("c.png").exists());
    assert!(!out_dir.join("corrupt.png").exists());
    assert!(!out_dir.join("corrupt.jpg").exists());
}

#[test]
fn test_events_arrive_in_processing_order() {
    let temp_dir = TempDir::new().unwrap();
    let photos = temp_dir.path().join("photos");
    std::fs::create_dir(&photos).unwrap();
    write_photo(&photos.join("one.png"));
    write_photo(&photos.join("two.png"));

    let mut events = Vec::new();
    batch::run_with_events(&photos, &png_config(), &BatchOptions::default(), &mut |e| {
        events.push(e)
    })
    .unwrap();

    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], BatchEvent::Started { total: 2 }));
    match (&events[1], &events[2]) {
        (
            BatchEvent::FileFinished {
                source: first,
                ok: true,
                completed: 1,
                total: 2,
            },
            BatchEvent::FileFinished {
                source: second,
                ok: true,
                completed: 2,
                total: 2,
            },
        ) => {
            // Sorted enumeration.
            assert!(first.file_name().unwrap() < second.file_name().unwrap());
        }
        other => panic!("unexpected events: {:?}", other),
    }
    match &events[3] {
        BatchEvent::Finished(summary) => {
            assert_eq!((summary.succeeded, summary.total), (2, 2))
        }
        other => panic!("unexpected final event: {:?}", other),
    }
}

#[test]
fn test_output_directory_is_not_reprocessed() {
    let temp_dir = TempDir::new().unwrap();
    let photos = temp_dir.path().join("photos");
    std::fs::create_dir(&photos).unwrap();
    write_photo(&photos.join("a.png"));
    write_photo(&photos.join("b.png"));

    let first = batch::run(&photos, &png_config(), &BatchOptions::default()).unwrap();
    assert_eq!((first.succeeded, first.total), (2, 2));

    // The default output directory sits inside the input; a second run must
    // skip it rather than watermark the watermarks.
    let second = batch::run(&photos, &png_config(), &BatchOptions::default()).unwrap();
    assert_eq!((second.succeeded, second.total), (2, 2));

    let out_dir = photos.join("photos_watermark");
    let produced: Vec<_> = std::fs::read_dir(&out_dir).unwrap().collect();
    assert_eq!(produced.len(), 2);
}

#[test]
fn test_recursive_run_mirrors_subdirectories() {
    let temp_dir = TempDir::new().unwrap();
    let photos = temp_dir.path().join("photos");
    std::fs::create_dir_all(photos.join("trip")).unwrap();
    write_photo(&photos.join("top.png"));
    write_photo(&photos.join("trip").join("nested.png"));

    let flat = batch::run(&photos, &png_config(), &BatchOptions::default()).unwrap();
    assert_eq!(flat.total, 1);

    let options = BatchOptions {
        recursive: true,
        ..BatchOptions::default()
    };
    let recursive = batch::run(&photos, &png_config(), &options).unwrap();
    assert_eq!(recursive.total, 2);

    let out_dir = photos.join("photos_watermark");
    assert!(out_dir.join("top.png").exists());
    assert!(out_dir.join("trip").join("nested.png").exists());
}

#[test]
fn test_single_file_default_output_name() {
    let temp_dir = TempDir::new().unwrap();
    let photo = temp_dir.path().join("vacation.png");
    write_photo(&photo);

    let summary = batch::run(&photo, &png_config(), &BatchOptions::default()).unwrap();
    assert!(summary.all_succeeded());
    assert!(temp_dir.path().join("vacation_watermark.png").exists());
}

#[test]
fn test_single_file_jpeg_output() {
    let temp_dir = TempDir::new().unwrap();
    let photo = temp_dir.path().join("vacation.png");
    write_photo(&photo);

    let config = WatermarkConfig {
        output_format: OutputFormat::Jpeg,
        ..png_config()
    };
    batch::run(&photo, &config, &BatchOptions::default()).unwrap();

    let out = temp_dir.path().join("vacation_watermark.jpg");
    assert!(out.exists());
    let decoded = image::open(&out).unwrap();
    assert!(matches!(decoded, DynamicImage::ImageRgb8(_)));
}

#[test]
fn test_single_file_explicit_output_with_new_directories() {
    let temp_dir = TempDir::new().unwrap();
    let photo = temp_dir.path().join("photo.png");
    write_photo(&photo);

    let dest = temp_dir.path().join("exports").join("stamped.png");
    let options = BatchOptions {
        output: Some(dest.clone()),
        ..BatchOptions::default()
    };
    let summary = batch::run(&photo, &png_config(), &options).unwrap();
    assert!(summary.all_succeeded());
    assert!(dest.exists());
}

#[test]
fn test_missing_input_is_a_hard_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");

    let result = batch::run(&missing, &png_config(), &BatchOptions::default());
    assert!(matches!(result, Err(BatchError::InputMissing(_))));
}

#[test]
fn test_empty_directory_processes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let photos = temp_dir.path().join("photos");
    std::fs::create_dir(&photos).unwrap();

    let summary = batch::run(&photos, &png_config(), &BatchOptions::default()).unwrap();
    assert_eq!(summary.total, 0);
    assert!(!summary.all_succeeded());
}

#[test]
fn test_capture_date_falls_back_to_file_time() {
    let temp_dir = TempDir::new().unwrap();
    let photo = temp_dir.path().join("no_exif.png");
    write_photo(&photo);

    let resolved = batch::capture_date_text(&photo);
    assert!(resolved.is_fallback(), "PNG has no EXIF capture date");

    let text = resolved.into_value();
    assert_eq!(text.len(), 10, "expected YYYY-MM-DD, got {:?}", text);
    assert!(text.chars().filter(|c| *c == '-').count() == 2);
}

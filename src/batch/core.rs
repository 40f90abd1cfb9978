use crate::batch::error::BatchError;
use crate::batch::metadata::capture_date_text;
use crate::compositor::{self, CompositorError, OutputFormat, WatermarkConfig, formats};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Extensions eligible for directory runs, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Destination override. Names a directory for directory inputs and the
    /// exact output file for single-file inputs.
    pub output: Option<PathBuf>,
    /// Also process subdirectories of a directory input.
    pub recursive: bool,
    /// Appended to the input directory's name for the default output
    /// directory.
    pub directory_suffix: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output: None,
            recursive: false,
            directory_suffix: "_watermark".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub succeeded: usize,
    pub total: usize,
}

impl RunSummary {
    /// True only when something was processed and nothing failed; this is
    /// what decides the process exit code.
    pub fn all_succeeded(&self) -> bool {
        self.total > 0 && self.succeeded == self.total
    }
}

/// Progress notifications for front-ends that report per-file state.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    FileFinished {
        source: PathBuf,
        ok: bool,
        completed: usize,
        total: usize,
    },
    Finished(RunSummary),
}

/// Watermarks a file or every supported image in a directory. Individual
/// file failures are counted and skipped; only a missing input or an
/// unusable output location fails the run itself.
pub fn run(
    input: &Path,
    config: &WatermarkConfig,
    options: &BatchOptions,
) -> Result<RunSummary, BatchError> {
    run_with_events(input, config, options, &mut |_| {})
}

pub fn run_with_events(
    input: &Path,
    config: &WatermarkConfig,
    options: &BatchOptions,
    notify: &mut dyn FnMut(BatchEvent),
) -> Result<RunSummary, BatchError> {
    if input.is_file() {
        run_single_file(input, config, options, notify)
    } else if input.is_dir() {
        run_directory(input, config, options, notify)
    } else {
        Err(BatchError::InputMissing(input.to_path_buf()))
    }
}

fn run_single_file(
    input: &Path,
    config: &WatermarkConfig,
    options: &BatchOptions,
    notify: &mut dyn FnMut(BatchEvent),
) -> Result<RunSummary, BatchError> {
    let dest = match &options.output {
        Some(path) => path.clone(),
        None => default_single_output(input, config.output_format),
    };
    prepare_parent(&dest)?;

    notify(BatchEvent::Started { total: 1 });
    info!("Processing {}", input.display());
    let ok = match process_file(input, &dest, config) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to process {}: {}", input.display(), e);
            false
        }
    };

    let summary = RunSummary {
        succeeded: usize::from(ok),
        total: 1,
    };
    notify(BatchEvent::FileFinished {
        source: input.to_path_buf(),
        ok,
        completed: 1,
        total: 1,
    });
    notify(BatchEvent::Finished(summary));
    Ok(summary)
}

fn run_directory(
    input: &Path,
    config: &WatermarkConfig,
    options: &BatchOptions,
    notify: &mut dyn FnMut(BatchEvent),
) -> Result<RunSummary, BatchError> {
    let output_dir = match &options.output {
        Some(path) => path.clone(),
        None => default_directory_output(input, &options.directory_suffix),
    };

    let files = collect_files(input, &output_dir, options.recursive);
    if files.is_empty() {
        warn!("No supported image files found in {}", input.display());
        let summary = RunSummary::default();
        notify(BatchEvent::Finished(summary));
        return Ok(summary);
    }

    std::fs::create_dir_all(&output_dir)?;
    info!(
        "Processing {} files from {} into {}",
        files.len(),
        input.display(),
        output_dir.display()
    );

    let total = files.len();
    notify(BatchEvent::Started { total });

    let mut succeeded = 0;
    for (index, source) in files.iter().enumerate() {
        let dest = output_path_for(source, input, &output_dir, config.output_format);
        info!("Processing {}", source.display());
        let outcome = prepare_parent(&dest).and_then(|()| process_file(source, &dest, config));
        let ok = match outcome {
            Ok(()) => {
                succeeded += 1;
                true
            }
            Err(e) => {
                error!("Failed to process {}: {}", source.display(), e);
                false
            }
        };
        notify(BatchEvent::FileFinished {
            source: source.clone(),
            ok,
            completed: index + 1,
            total,
        });
    }

    let summary = RunSummary { succeeded, total };
    info!(
        "Batch complete: {}/{} files succeeded",
        summary.succeeded, summary.total
    );
    notify(BatchEvent::Finished(summary));
    Ok(summary)
}

/// One file end to end: decode, compose, encode. The config is cloned per
/// file so the capture-date text never leaks between items.
fn process_file(
    source: &Path,
    dest: &Path,
    config: &WatermarkConfig,
) -> Result<(), CompositorError> {
    let effective = per_file_config(source, config);
    let image = image::open(source)?;
    let composed = compositor::compose(&image, &effective);

    match effective.output_format {
        OutputFormat::Jpeg => {
            let icc = formats::jpeg::extract_icc_profile(source);
            formats::jpeg::save(&composed, dest, effective.jpeg_quality, icc.as_deref())?;
        }
        OutputFormat::Png => formats::png::save(&composed, dest)?,
    }
    Ok(())
}

fn per_file_config(source: &Path, config: &WatermarkConfig) -> WatermarkConfig {
    let mut effective = config.clone();
    if effective.effective_text().is_none() {
        let resolved = capture_date_text(source);
        if let Some(fallback) = resolved.fallback() {
            debug!("{}: {}", source.display(), fallback.reason);
        }
        effective.text = Some(resolved.into_value());
    }
    effective
}

/// Files to process, in sorted order for stable runs. The output directory
/// is excluded so recursive runs never re-watermark their own results.
fn collect_files(input: &Path, output_dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(input).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| {
            let path = entry.path();
            path.is_file() && is_supported_image(path) && !path.starts_with(output_dir)
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Default output directory for a directory input, placed inside the input
/// itself.
pub fn default_directory_output(input: &Path, suffix: &str) -> PathBuf {
    let resolved = input.canonicalize().unwrap_or_else(|_| input.to_path_buf());
    let name = resolved
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("batch");
    input.join(format!("{name}{suffix}"))
}

/// Default output file for a single-file input, written next to it.
pub fn default_single_output(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("watermarked");
    input.with_file_name(format!("{}_watermark.{}", stem, format.extension()))
}

fn output_path_for(
    source: &Path,
    input_root: &Path,
    output_dir: &Path,
    format: OutputFormat,
) -> PathBuf {
    // Subdirectory structure is mirrored for recursive runs.
    let relative = source
        .strip_prefix(input_root)
        .unwrap_or_else(|_| Path::new(source.file_name().unwrap_or_default()));
    let mut dest = output_dir.join(relative);
    dest.set_extension(format.extension());
    dest
}

fn prepare_parent(dest: &Path) -> Result<(), CompositorError> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::OutputFormat;

    #[test]
    fn test_supported_extensions_case_insensitive() {
        assert!(is_supported_image(Path::new("a.jpg")));
        assert!(is_supported_image(Path::new("a.JPG")));
        assert!(is_supported_image(Path::new("a.JpEg")));
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("a.bmp")));
        assert!(is_supported_image(Path::new("a.TIFF")));
    }

    #[test]
    fn test_unsupported_extensions_rejected() {
        assert!(!is_supported_image(Path::new("a.gif")));
        assert!(!is_supported_image(Path::new("a.webp")));
        assert!(!is_supported_image(Path::new("a.txt")));
        assert!(!is_supported_image(Path::new("noextension")));
    }

    #[test]
    fn test_default_directory_output_inside_input() {
        let out = default_directory_output(Path::new("/photos/vacation"), "_watermark");
        assert_eq!(out, Path::new("/photos/vacation/vacation_watermark"));
    }

    #[test]
    fn test_default_single_output_beside_input() {
        let out = default_single_output(Path::new("/photos/img.png"), OutputFormat::Jpeg);
        assert_eq!(out, Path::new("/photos/img_watermark.jpg"));
    }

    #[test]
    fn test_output_path_swaps_extension() {
        let dest = output_path_for(
            Path::new("/in/deep/photo.bmp"),
            Path::new("/in"),
            Path::new("/out"),
            OutputFormat::Png,
        );
        assert_eq!(dest, Path::new("/out/deep/photo.png"));
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let result = run(
            Path::new("/definitely/not/here"),
            &crate::compositor::WatermarkConfig::default(),
            &BatchOptions::default(),
        );
        assert!(matches!(result, Err(BatchError::InputMissing(_))));
    }
}

//! Batch image conversion.
//!
//! Walks the asset directory recursively and writes a WebP (or AVIF) sibling
//! for every PNG/JPEG it finds:
//!
//! ```text
//! assets/img/
//! ├── hero.jpg          →  hero.webp
//! ├── logo.png          →  logo.webp     (alpha kept)
//! └── projects/
//!     └── shot.PNG      →  shot.webp     (extensions match case-insensitively)
//! ```
//!
//! ## Per-file outcome
//!
//! Every source produces exactly one [`FileOutcome`]:
//!
//! - **Skipped**: the output already exists and is strictly newer than the
//!   source. Nothing is read or written.
//! - **Converted**: the output was (re)written. Carries both sizes so the
//!   caller can report savings, and what happened to the original when
//!   `delete_originals` is on.
//! - **Failed**: reading, decoding or encoding went wrong. The run continues
//!   with the next file.
//!
//! Only two conditions stop the run before any file is touched: a missing
//! codec in this build, and a missing source directory.
//!
//! ## Ordering
//!
//! Sources are collected up front, sorted by file name at every directory
//! level, then processed one at a time. Collecting first means deleting
//! originals never disturbs the walk.

use crate::config::OptimizeConfig;
use crate::imaging::{
    BackendError, ColorTarget, ImageBackend, OutputFormat, Quality, RustBackend, convert_image,
    missing_codecs, size_savings,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions picked up as conversion sources (compared case-insensitively).
pub const SOURCE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Image support missing from this build: {}", .0.join(", "))]
    MissingCodecs(Vec<String>),
}

/// What happened to the original after a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRemoval {
    Kept,
    Deleted,
    Failed(String),
}

/// Result of handling one source image.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Converted {
        source: PathBuf,
        output: PathBuf,
        original_size: u64,
        converted_size: u64,
        color: ColorTarget,
        removal: SourceRemoval,
    },
    Skipped {
        source: PathBuf,
        output: PathBuf,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Converted { source, .. }
            | FileOutcome::Skipped { source, .. }
            | FileOutcome::Failed { source, .. } => source,
        }
    }

    /// Percentage saved, for conversions with a non-empty source.
    pub fn savings(&self) -> Option<f64> {
        match self {
            FileOutcome::Converted {
                original_size,
                converted_size,
                ..
            } => size_savings(*original_size, *converted_size),
            _ => None,
        }
    }
}

/// All outcomes of a run, in processing order.
#[derive(Debug, Default)]
pub struct OptimizeReport {
    pub outcomes: Vec<FileOutcome>,
}

impl OptimizeReport {
    pub fn converted(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Converted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    /// Originals that were converted but could not be deleted.
    pub fn removal_failures(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FileOutcome::Converted {
                    removal: SourceRemoval::Failed(_),
                    ..
                }
            )
        })
    }

    /// Net bytes saved across all conversions (negative if outputs grew).
    pub fn bytes_saved(&self) -> i64 {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Converted {
                    original_size,
                    converted_size,
                    ..
                } => *original_size as i64 - *converted_size as i64,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Convert every source image under `config.source_dir` with the built-in backend.
///
/// `on_outcome` is called after each file with its 1-based position, so the
/// caller can print progress while the run is still going.
pub fn optimize(
    config: &OptimizeConfig,
    on_outcome: impl FnMut(usize, &FileOutcome),
) -> Result<OptimizeReport, OptimizeError> {
    check_codecs(config.format)?;
    optimize_with_backend(&RustBackend::new(), config, on_outcome)
}

/// Fail before touching any file when this build cannot decode the sources
/// or encode `format`.
pub fn check_codecs(format: OutputFormat) -> Result<(), OptimizeError> {
    let missing = missing_codecs(format);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(OptimizeError::MissingCodecs(missing))
    }
}

/// Convert using a specific backend (allows testing with mock).
pub fn optimize_with_backend(
    backend: &impl ImageBackend,
    config: &OptimizeConfig,
    mut on_outcome: impl FnMut(usize, &FileOutcome),
) -> Result<OptimizeReport, OptimizeError> {
    check_source_dir(&config.source_dir)?;

    let quality = Quality::new(config.quality);
    let mut report = OptimizeReport::default();

    for (i, source) in discover_sources(&config.source_dir).iter().enumerate() {
        let outcome = convert_file(
            backend,
            source,
            config.format,
            quality,
            config.delete_originals,
        );
        on_outcome(i + 1, &outcome);
        report.outcomes.push(outcome);
    }

    Ok(report)
}

/// The source root must be an existing directory.
pub fn check_source_dir(dir: &Path) -> Result<(), OptimizeError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(OptimizeError::SourceNotFound(dir.to_path_buf()))
    }
}

/// All convertible images under `root`, recursively, in sorted walk order.
///
/// Symlinks are followed, so linked images and linked folders are converted
/// in place. Unreadable entries are skipped, link loops included.
pub fn discover_sources(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_source_image(p))
        .collect()
}

/// Whether the path has one of the [`SOURCE_EXTENSIONS`].
pub fn is_source_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Output path for a source: same directory and stem, target extension.
pub fn output_path_for(source: &Path, format: OutputFormat) -> PathBuf {
    source.with_extension(format.extension())
}

/// An output is up to date when it exists and is strictly newer than its source.
pub fn is_up_to_date(source: &Path, output: &Path) -> io::Result<bool> {
    let output_meta = match fs::metadata(output) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    let source_modified = fs::metadata(source)?.modified()?;
    Ok(output_meta.modified()? > source_modified)
}

/// Convert one source, turning every error into a [`FileOutcome::Failed`].
pub fn convert_file(
    backend: &impl ImageBackend,
    source: &Path,
    format: OutputFormat,
    quality: Quality,
    delete_original: bool,
) -> FileOutcome {
    try_convert(backend, source, format, quality, delete_original).unwrap_or_else(|e| {
        FileOutcome::Failed {
            source: source.to_path_buf(),
            error: e.to_string(),
        }
    })
}

fn try_convert(
    backend: &impl ImageBackend,
    source: &Path,
    format: OutputFormat,
    quality: Quality,
    delete_original: bool,
) -> Result<FileOutcome, BackendError> {
    let output = output_path_for(source, format);
    if is_up_to_date(source, &output)? {
        return Ok(FileOutcome::Skipped {
            source: source.to_path_buf(),
            output,
        });
    }

    let original_size = fs::metadata(source)?.len();
    let color = convert_image(backend, source, &output, format, quality)?;
    let converted_size = fs::metadata(&output)?.len();

    let removal = if delete_original {
        match fs::remove_file(source) {
            Ok(()) => SourceRemoval::Deleted,
            Err(e) => SourceRemoval::Failed(e.to_string()),
        }
    } else {
        SourceRemoval::Kept
    };

    Ok(FileOutcome::Converted {
        source: source.to_path_buf(),
        output,
        original_size,
        converted_size,
        color,
        removal,
    })
}

//! CLI output formatting for every tool.
//!
//! # Information-First Display
//!
//! Every entity (source image, album) leads with its positional index and its
//! identity, with filesystem paths shown as secondary context via indented
//! `Source:` lines. Paths are shown relative to the project root.
//!
//! # Output Format
//!
//! ## Optimize
//!
//! ```text
//! 001 hero.jpg → hero.webp (63.2% smaller)
//!     Source: assets/img/hero.jpg
//! 002 logo.png → logo.webp (41.0% smaller)
//!     Source: assets/img/logo.png
//!     Alpha: kept
//! 003 banner.png (up to date)
//!     Source: assets/img/banner.png
//! 004 broken.jpg (failed)
//!     Source: assets/img/broken.jpg
//!     Error: Failed to decode ...
//!
//! Done: 2 converted, 1 skipped, 1 failed (saved 1.4 MB)
//! ```
//!
//! ## Gallery
//!
//! ```text
//! 001 Digital Creations (2 images)
//!     Source: digital-art/
//!     Cover: assets/img/gallery/digital-art/a.jpg
//! 002 Concept Sketches (0 images)
//!     Source: concept-sketches/ (created)
//!     Cover: assets/img/thumbnails/album_placeholder.png
//!
//! Updated assets/data/images.json (4 albums)
//! ```
//!
//! ## Blogs
//!
//! ```text
//! 001 Firing the Kiln
//!     Source: blog/2024-kiln.html
//! 002 drafts.html (failed)
//!     Source: blog/drafts.html
//!     Error: Is a directory (os error 21)
//!
//! Generated blogs.json with 1 post
//! ```
//!
//! ## Images
//!
//! ```text
//! 001 banner.webp
//! 002 logo.svg
//!
//! Generated images.json with 2 files
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::blogs::{BlogsReport, PostResult};
use crate::gallery::{AlbumReport, AlbumStatus, GalleryReport};
use crate::image_list::ImageListReport;
use crate::imaging::ColorTarget;
use crate::optimize::{FileOutcome, OptimizeReport, SourceRemoval};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to `root` when it lives under it, as-is otherwise.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Size change as shown to the user, one decimal.
///
/// ```text
/// (63.2% smaller)
/// (4.0% larger)
/// ```
fn format_savings(percent: f64) -> String {
    if percent >= 0.0 {
        format!("({:.1}% smaller)", percent)
    } else {
        format!("({:.1}% larger)", -percent)
    }
}

/// Byte count in the largest unit that keeps the number above 1.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

// ============================================================================
// Optimize output
// ============================================================================

/// Format one converter outcome as display lines.
pub fn format_file_outcome(index: usize, outcome: &FileOutcome, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let source = outcome.source();
    let context = indent(1);

    match outcome {
        FileOutcome::Converted {
            output,
            color,
            removal,
            ..
        } => {
            let mut header = format!(
                "{} {} \u{2192} {}",
                format_index(index),
                file_name(source),
                file_name(output)
            );
            if let Some(percent) = outcome.savings() {
                header.push(' ');
                header.push_str(&format_savings(percent));
            }
            lines.push(header);
            lines.push(format!("{}Source: {}", context, display_path(source, root)));
            if *color == ColorTarget::Rgba {
                lines.push(format!("{}Alpha: kept", context));
            }
            match removal {
                SourceRemoval::Kept => {}
                SourceRemoval::Deleted => lines.push(format!("{}Deleted original", context)),
                SourceRemoval::Failed(e) => {
                    lines.push(format!("{}Could not delete original: {}", context, e))
                }
            }
        }
        FileOutcome::Skipped { .. } => {
            lines.push(format!(
                "{} {} (up to date)",
                format_index(index),
                file_name(source)
            ));
            lines.push(format!("{}Source: {}", context, display_path(source, root)));
        }
        FileOutcome::Failed { error, .. } => {
            lines.push(format!("{} {} (failed)", format_index(index), file_name(source)));
            lines.push(format!("{}Source: {}", context, display_path(source, root)));
            lines.push(format!("{}Error: {}", context, error));
        }
    }

    lines
}

/// Print one converter outcome to stdout.
pub fn print_file_outcome(index: usize, outcome: &FileOutcome, root: &Path) {
    for line in format_file_outcome(index, outcome, root) {
        println!("{}", line);
    }
}

/// Format the end-of-run converter summary.
pub fn format_optimize_summary(report: &OptimizeReport) -> Vec<String> {
    let mut lines = Vec::new();
    if !report.outcomes.is_empty() {
        lines.push(String::new());
    }

    let mut summary = format!(
        "Done: {} converted, {} skipped, {} failed",
        report.converted(),
        report.skipped(),
        report.failed()
    );
    let saved = report.bytes_saved();
    if report.converted() > 0 {
        if saved >= 0 {
            summary.push_str(&format!(" (saved {})", format_bytes(saved as u64)));
        } else {
            summary.push_str(&format!(" (grew {})", format_bytes(saved.unsigned_abs())));
        }
    }
    lines.push(summary);

    let removal_failures = report.removal_failures();
    if removal_failures > 0 {
        lines.push(format!(
            "{}{} original(s) could not be deleted",
            indent(1),
            removal_failures
        ));
    }
    lines
}

/// Print the converter summary to stdout.
pub fn print_optimize_summary(report: &OptimizeReport) {
    for line in format_optimize_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Gallery output
// ============================================================================

/// Format one album's rebuild result.
fn format_album(index: usize, album: &AlbumReport) -> Vec<String> {
    let mut lines = Vec::new();
    let context = indent(1);

    let detail = match &album.status {
        AlbumStatus::Scanned { image_count: 1 } => "1 image".to_string(),
        AlbumStatus::Scanned { image_count } => format!("{} images", image_count),
        AlbumStatus::ScanFailed { .. } => "folder unreadable".to_string(),
        AlbumStatus::Skipped { .. } => "skipped".to_string(),
    };
    lines.push(format!("{} {} ({})", format_index(index), album.title, detail));

    let created = if album.folder_created { " (created)" } else { "" };
    lines.push(format!("{}Source: {}/{}", context, album.id, created));

    if let Some(cover) = &album.cover {
        lines.push(format!("{}Cover: {}", context, cover));
    }
    match &album.status {
        AlbumStatus::ScanFailed { error } | AlbumStatus::Skipped { error } => {
            lines.push(format!("{}Error: {}", context, error));
        }
        AlbumStatus::Scanned { .. } => {}
    }
    lines
}

/// Format the full gallery rebuild output.
pub fn format_gallery_output(report: &GalleryReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    if report.prior_malformed {
        lines.push(format!(
            "Existing manifest is not a JSON array, starting from defaults: {}",
            display_path(&report.manifest, root)
        ));
    }

    for (i, album) in report.albums.iter().enumerate() {
        lines.extend(format_album(i + 1, album));
    }

    if !report.albums.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Updated {} ({})",
        display_path(&report.manifest, root),
        plural(report.entries.len(), "album")
    ));
    lines
}

/// Print gallery rebuild output to stdout.
pub fn print_gallery_output(report: &GalleryReport, root: &Path) {
    for line in format_gallery_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Blog index output
// ============================================================================

/// Format the blog index run.
pub fn format_blogs_output(report: &BlogsReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let context = indent(1);

    for (i, result) in report.results.iter().enumerate() {
        match result {
            PostResult::Indexed { source, title } => {
                lines.push(format!("{} {}", format_index(i + 1), title));
                lines.push(format!("{}Source: {}", context, display_path(source, root)));
            }
            PostResult::Failed { source, error } => {
                lines.push(format!("{} {} (failed)", format_index(i + 1), file_name(source)));
                lines.push(format!("{}Source: {}", context, display_path(source, root)));
                lines.push(format!("{}Error: {}", context, error));
            }
        }
    }

    if !report.results.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Generated {} with {}",
        display_path(&report.output, root),
        plural(report.posts.len(), "post")
    ));
    lines
}

pub fn print_blogs_output(report: &BlogsReport, root: &Path) {
    for line in format_blogs_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Image list output
// ============================================================================

/// Format the image listing run.
pub fn format_image_list_output(report: &ImageListReport, root: &Path) -> Vec<String> {
    let mut lines: Vec<String> = report
        .images
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} {}", format_index(i + 1), name))
        .collect();

    if !report.images.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Generated {} with {}",
        display_path(&report.output, root),
        plural(report.images.len(), "file")
    ));
    lines
}

pub fn print_image_list_output(report: &ImageListReport, root: &Path) {
    for line in format_image_list_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

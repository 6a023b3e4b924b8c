//! Shared test utilities for the portfolio-assets test suite.
//!
//! Synthetic image fixtures (written with the `image` crate), an on-disk site
//! layout builder, and mtime manipulation for up-to-date checks.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteFixture::new();
//! write_jpeg(&site.asset("projects/hero.jpg"), 64, 48);
//! backdate(&site.asset("projects/hero.jpg"), 3600);
//! ```

use crate::config::AssetsConfig;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

// =========================================================================
// Image fixtures
// =========================================================================

/// Write an opaque RGB gradient PNG.
pub fn write_rgb_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 128])
    });
    img.save(path).unwrap();
}

/// Write an RGBA PNG whose left half is fully transparent.
///
/// Real transparency matters: encoders drop an alpha plane that is opaque
/// everywhere.
pub fn write_rgba_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([200, (y * 9 % 256) as u8, 40, alpha])
    });
    img.save(path).unwrap();
}

/// Write a small baseline JPEG.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 96])
    });
    img.save(path).unwrap();
}

/// A 4x2 palette PNG (color type 3, red/blue checkerboard, no tRNS).
///
/// Checked in as bytes because the `image` encoder never writes palettes.
pub const PALETTE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x02, 0x08, 0x03, 0x00, 0x00, 0x00, 0x48,
    0x76, 0x8D, 0x51, 0x00, 0x00, 0x00, 0x06, 0x50, 0x4C, 0x54, 0x45, 0xFF, 0x00, 0x00, 0x00,
    0x00, 0xFF, 0x6C, 0xA1, 0xFD, 0x8E, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x78,
    0xDA, 0x63, 0x60, 0x60, 0x84, 0x42, 0x00, 0x00, 0x1E, 0x00, 0x05, 0x6B, 0x49, 0x20, 0x25,
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Write [`PALETTE_PNG`] to `path`.
pub fn write_palette_png(path: &Path) {
    ensure_parent(path);
    std::fs::write(path, PALETTE_PNG).unwrap();
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
}

// =========================================================================
// Modification times
// =========================================================================

/// Move a file's modification time `secs` seconds into the past.
pub fn backdate(path: &Path, secs: u64) {
    let when = SystemTime::now() - Duration::from_secs(secs);
    set_mtime(path, when);
}

/// Set a file's modification time.
pub fn set_mtime(path: &Path, when: SystemTime) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(when).unwrap();
}

pub fn mtime(path: &Path) -> SystemTime {
    std::fs::metadata(path).unwrap().modified().unwrap()
}

// =========================================================================
// Site layout
// =========================================================================

/// A temporary portfolio checkout with stock config paths rooted inside it.
pub struct SiteFixture {
    /// Keeps the checkout alive for the fixture's lifetime.
    _dir: TempDir,
    pub config: AssetsConfig,
}

impl SiteFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = AssetsConfig::default().rooted_at(dir.path());
        std::fs::create_dir_all(&config.optimize.source_dir).unwrap();
        Self { _dir: dir, config }
    }

    /// Path under the converter's source directory.
    pub fn asset(&self, rel: &str) -> PathBuf {
        self.config.optimize.source_dir.join(rel)
    }

    /// Path inside an album folder.
    pub fn album_file(&self, album: &str, name: &str) -> PathBuf {
        self.config.gallery.gallery_dir.join(album).join(name)
    }

    /// Create the manifest file with the given contents.
    pub fn write_manifest(&self, contents: &str) {
        ensure_parent(&self.config.gallery.manifest);
        std::fs::write(&self.config.gallery.manifest, contents).unwrap();
    }

    pub fn read_manifest(&self) -> String {
        std::fs::read_to_string(&self.config.gallery.manifest).unwrap()
    }

    /// Touch an empty file inside an album folder.
    pub fn touch_album_file(&self, album: &str, name: &str) {
        let path = self.album_file(album, name);
        ensure_parent(&path);
        std::fs::write(path, b"").unwrap();
    }
}

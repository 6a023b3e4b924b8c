//! Pipeline configuration.
//!
//! Every tool reads the same `portfolio.toml`. Every key is optional: stock
//! defaults reproduce the layout of the portfolio site (`assets/img`,
//! `assets/data/images.json`, four albums, `blog/`, `images/`), so running any
//! command with no config file at all does the expected thing.
//!
//! ## Configuration Options
//!
//! ```toml
//! [optimize]
//! source_dir = "assets/img"     # Walked recursively for png/jpg/jpeg
//! quality = 85                  # Lossy encoding quality (0-100)
//! delete_originals = false      # Remove the source after a successful conversion
//! format = "webp"               # "webp" or "avif"
//!
//! [gallery]
//! gallery_dir = "assets/img/gallery"
//! manifest = "assets/data/images.json"
//! web_prefix = "assets/img/gallery"
//! placeholder_cover = "assets/img/thumbnails/album_placeholder.png"
//!
//! [[gallery.albums]]
//! id = "digital-art"            # Folder name and manifest merge key
//! name = "Digital Creations"    # Display name used for default title/description
//!
//! [blogs]
//! blog_dir = "blog"             # .html/.htm posts, not recursive
//! output = "blogs.json"
//! url_prefix = "blog"
//! excerpt_chars = 300
//!
//! [images]
//! image_dir = "images"          # Listed by file name, not recursive
//! output = "images.json"
//! ```
//!
//! Declaring `[[gallery.albums]]` replaces the whole default album list; the
//! order of the tables is the order of the written manifest.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::OutputFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, resolved against the project root.
pub const CONFIG_FILENAME: &str = "portfolio.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration for every tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Image conversion settings.
    pub optimize: OptimizeConfig,
    /// Gallery manifest settings.
    pub gallery: GalleryConfig,
    /// Blog index settings.
    pub blogs: BlogsConfig,
    /// Flat image list settings.
    pub images: ImageListConfig,
}

/// Settings for the `optimize` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeConfig {
    /// Root directory walked recursively for source images.
    pub source_dir: PathBuf,
    /// Lossy encoding quality (0 = worst, 100 = best).
    pub quality: u32,
    /// Delete each source file right after it converts successfully.
    pub delete_originals: bool,
    /// Target format written next to each source.
    pub format: OutputFormat,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("assets/img"),
            quality: 85,
            delete_originals: false,
            format: OutputFormat::Webp,
        }
    }
}

/// Settings for the `gallery` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Directory holding one folder per album.
    pub gallery_dir: PathBuf,
    /// Manifest file rewritten on every run. Must already exist.
    pub manifest: PathBuf,
    /// URL prefix for image paths written to the manifest.
    pub web_prefix: String,
    /// Sentinel cover used until an album has a real one.
    pub placeholder_cover: String,
    /// Albums in manifest order.
    pub albums: Vec<AlbumSpec>,
}

/// Settings for the `blogs` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogsConfig {
    /// Directory of `.html`/`.htm` posts (not recursive).
    pub blog_dir: PathBuf,
    /// Index file written on every run.
    pub output: PathBuf,
    /// URL prefix for each post's `url`.
    pub url_prefix: String,
    /// Longest excerpt, in characters, before it is cut with an ellipsis.
    pub excerpt_chars: usize,
}

impl Default for BlogsConfig {
    fn default() -> Self {
        Self {
            blog_dir: PathBuf::from("blog"),
            output: PathBuf::from("blogs.json"),
            url_prefix: "blog".to_string(),
            excerpt_chars: 300,
        }
    }
}

/// Settings for the `images` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageListConfig {
    /// Directory whose image files are listed (not recursive).
    pub image_dir: PathBuf,
    /// List file written on every run.
    pub output: PathBuf,
}

impl Default for ImageListConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("images"),
            output: PathBuf::from("images.json"),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            gallery_dir: PathBuf::from("assets/img/gallery"),
            manifest: PathBuf::from("assets/data/images.json"),
            web_prefix: "assets/img/gallery".to_string(),
            placeholder_cover: "assets/img/thumbnails/album_placeholder.png".to_string(),
            albums: vec![
                AlbumSpec::new("digital-art", "Digital Creations"),
                AlbumSpec::new("concept-sketches", "Concept Sketches"),
                AlbumSpec::new("3d-renders", "3D Renders"),
                AlbumSpec::new("photography", "Photography"),
            ],
        }
    }
}

/// One configured album: folder name plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlbumSpec {
    /// Folder name under `gallery_dir`; also the manifest merge key.
    pub id: String,
    /// Human-readable name, used when the manifest has no title yet.
    pub name: String,
}

impl AlbumSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl AssetsConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.optimize.quality > 100 {
            return Err(ConfigError::Validation(
                "optimize.quality must be 0-100".into(),
            ));
        }
        let mut seen = HashSet::new();
        for album in &self.gallery.albums {
            if album.id.is_empty() {
                return Err(ConfigError::Validation(
                    "gallery.albums ids must not be empty".into(),
                ));
            }
            if album.id.contains(['/', '\\']) || album.id == "." || album.id == ".." {
                return Err(ConfigError::Validation(format!(
                    "gallery album id '{}' must be a plain folder name",
                    album.id
                )));
            }
            if !seen.insert(album.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate gallery album id '{}'",
                    album.id
                )));
            }
        }
        Ok(())
    }

    /// Resolve every relative path in the config against `root`.
    ///
    /// Absolute paths are left alone (`Path::join` replaces the base).
    pub fn rooted_at(mut self, root: &Path) -> Self {
        self.optimize.source_dir = root.join(&self.optimize.source_dir);
        self.gallery.gallery_dir = root.join(&self.gallery.gallery_dir);
        self.gallery.manifest = root.join(&self.gallery.manifest);
        self.blogs.blog_dir = root.join(&self.blogs.blog_dir);
        self.blogs.output = root.join(&self.blogs.output);
        self.images.image_dir = root.join(&self.images.image_dir);
        self.images.output = root.join(&self.images.output);
        self
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AssetsConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AssetsConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AssetsConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<AssetsConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `portfolio.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# portfolio-assets configuration
# ==============================
# All settings are optional. Values shown below are the defaults.
# Relative paths are resolved against the project root (--root).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Image conversion (`portfolio-assets optimize`)
# ---------------------------------------------------------------------------
[optimize]
# Walked recursively; every .png/.jpg/.jpeg gets a sibling in the target format.
source_dir = "assets/img"

# Lossy encoding quality (0 = worst, 100 = best).
quality = 85

# Delete each original right after it converts successfully.
delete_originals = false

# Target format: "webp" or "avif".
format = "webp"

# ---------------------------------------------------------------------------
# Gallery manifest (`portfolio-assets gallery`)
# ---------------------------------------------------------------------------
[gallery]
# One folder per album lives here. Missing album folders are created.
gallery_dir = "assets/img/gallery"

# Rewritten on every run. The file must already exist.
manifest = "assets/data/images.json"

# Prefix for the image paths written into the manifest.
web_prefix = "assets/img/gallery"

# Albums whose cover is still this placeholder get their first image as cover.
placeholder_cover = "assets/img/thumbnails/album_placeholder.png"

# Albums, in manifest order. Declaring any replaces the whole list.
[[gallery.albums]]
id = "digital-art"
name = "Digital Creations"

[[gallery.albums]]
id = "concept-sketches"
name = "Concept Sketches"

[[gallery.albums]]
id = "3d-renders"
name = "3D Renders"

[[gallery.albums]]
id = "photography"
name = "Photography"

# ---------------------------------------------------------------------------
# Blog index (`portfolio-assets blogs`)
# ---------------------------------------------------------------------------
[blogs]
# Every .html/.htm file directly inside becomes one post.
blog_dir = "blog"

# Rewritten on every run.
output = "blogs.json"

# Each post's url is <url_prefix>/<file name>.
url_prefix = "blog"

# Longer excerpts are cut and end with an ellipsis.
excerpt_chars = 300

# ---------------------------------------------------------------------------
# Flat image list (`portfolio-assets images`)
# ---------------------------------------------------------------------------
[images]
# Image file names directly inside are listed, sorted.
image_dir = "images"

# Rewritten on every run.
output = "images.json"
"##
}

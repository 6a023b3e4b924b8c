//! Flat image listing.
//!
//! Writes the names of the image files directly inside one directory as a
//! JSON array of strings, sorted by name:
//!
//! ```text
//! images/                    images.json
//! ├── banner.webp            [
//! ├── Logo.SVG        ──▶      "Logo.SVG",
//! ├── notes.txt (ignored)      "banner.webp"
//! └── old/ (ignored)         ]
//! ```

use crate::config::ImageListConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions listed (compared case-insensitively).
pub const LISTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "svg"];

#[derive(Error, Debug)]
pub enum ImageListError {
    #[error("Failed to read image directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct ImageListReport {
    pub output: PathBuf,
    pub images: Vec<String>,
}

pub fn is_listed_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            LISTED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Names of the listed image files in `dir`, sorted. Subdirectories are
/// never listed, whatever their name.
pub fn list_images(dir: &Path) -> Result<Vec<String>, ImageListError> {
    let read_dir_error = |source| ImageListError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_file() && is_listed_image(&path) {
            if let Some(name) = path.file_name() {
                names.push(name.to_string_lossy().into_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// List `config.image_dir` and overwrite `config.output`.
pub fn build_list(config: &ImageListConfig) -> Result<ImageListReport, ImageListError> {
    let images = list_images(&config.image_dir)?;
    let json = serde_json::to_string_pretty(&images)?;
    fs::write(&config.output, json)?;
    Ok(ImageListReport {
        output: config.output.clone(),
        images,
    })
}

//! Gallery manifest rebuilding.
//!
//! The site's gallery page reads a JSON manifest listing each album and its
//! images. Image lists are derived from the filesystem; everything else
//! (title, description, cover) is editorial and hand-edited in the manifest.
//! A rebuild rescans the folders and keeps the editorial fields.
//!
//! ```text
//! assets/img/gallery/
//! ├── digital-art/          ─┐
//! │   ├── a.jpg              │   assets/data/images.json
//! │   └── b.png              ├─▶ [ { "id": "digital-art",
//! ├── concept-sketches/      │       "title": "Digital Creations",
//! ├── 3d-renders/            │       "description": "...",
//! └── photography/          ─┘       "cover": "assets/img/gallery/digital-art/a.jpg",
//!                                    "images": [".../a.jpg", ".../b.png"] }, ... ]
//! ```
//!
//! ## Merge rules
//!
//! - Albums come from configuration, in configuration order. The `id` is the
//!   folder name and the key matched against the previous manifest.
//! - `title`, `description` and `cover` are kept from the previous entry with
//!   the same `id`; missing ones get defaults synthesized from the album's
//!   display name.
//! - `images` is always recomputed: files directly inside the folder with an
//!   image extension, as web paths, sorted.
//! - A placeholder cover is replaced by the first image once the album has one.
//!
//! ## Failure handling
//!
//! The manifest file must exist; otherwise nothing is scanned or written. A
//! previous manifest that does not parse is treated as empty. An album whose
//! folder cannot be created is left out; an album whose folder cannot be
//! listed is written with no images.

use crate::config::{AlbumSpec, GalleryConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions listed in album folders (compared case-insensitively).
pub const GALLERY_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "avif"];

/// Marks a stock placeholder cover wherever it lives.
pub const PLACEHOLDER_MARKER: &str = "album_placeholder";

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Manifest not found: {0}")]
    ManifestNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One album as written to the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover: String,
    pub images: Vec<String>,
}

/// Editorial fields recovered from a previous manifest entry.
///
/// Every field except `id` may be absent. A field holding anything other
/// than a string is treated as absent on its own; the others are still kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredAlbum {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,
}

impl StoredAlbum {
    /// Read one manifest element. `None` when it has no string `id`.
    pub fn from_value(item: &Value) -> Option<Self> {
        let text = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            id: text("id")?,
            title: text("title"),
            description: text("description"),
            cover: text("cover"),
        })
    }
}

/// Previous manifest contents, keyed by album id.
#[derive(Debug, Default)]
pub struct PriorManifest {
    albums: HashMap<String, StoredAlbum>,
    /// The file was not a JSON array and was treated as empty.
    pub malformed: bool,
}

impl PriorManifest {
    /// Parse manifest bytes. Never fails: unusable content yields an empty
    /// manifest, and array elements without a string `id` are dropped. When
    /// an id repeats, the last entry wins.
    pub fn parse(bytes: &[u8]) -> Self {
        let items = match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Array(items)) => items,
            _ => {
                return Self {
                    albums: HashMap::new(),
                    malformed: true,
                };
            }
        };
        let albums = items
            .iter()
            .filter_map(StoredAlbum::from_value)
            .map(|album| (album.id.clone(), album))
            .collect();
        Self {
            albums,
            malformed: false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&StoredAlbum> {
        self.albums.get(id)
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }
}

/// How one configured album fared during a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumStatus {
    /// Folder listed; the entry has `image_count` images.
    Scanned { image_count: usize },
    /// Folder could not be listed; the entry was written with no images.
    ScanFailed { error: String },
    /// Folder could not be created; no entry was written.
    Skipped { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumReport {
    pub id: String,
    pub title: String,
    /// The folder did not exist and was created during this run.
    pub folder_created: bool,
    /// Cover in the written entry, if one was written.
    pub cover: Option<String>,
    pub status: AlbumStatus,
}

/// Summary of a rebuild.
#[derive(Debug)]
pub struct GalleryReport {
    pub manifest: PathBuf,
    pub entries: Vec<AlbumEntry>,
    pub albums: Vec<AlbumReport>,
    /// The previous manifest did not parse and defaults were used throughout.
    pub prior_malformed: bool,
}

/// Rescan every configured album and rewrite the manifest.
pub fn rebuild(config: &GalleryConfig) -> Result<GalleryReport, GalleryError> {
    if !config.manifest.exists() {
        return Err(GalleryError::ManifestNotFound(config.manifest.clone()));
    }
    let prior = load_prior(&config.manifest)?;

    let mut entries = Vec::new();
    let mut albums = Vec::new();

    for spec in &config.albums {
        let folder = config.gallery_dir.join(&spec.id);

        let folder_created = match ensure_folder(&folder) {
            Ok(created) => created,
            Err(e) => {
                albums.push(AlbumReport {
                    id: spec.id.clone(),
                    title: spec.name.clone(),
                    folder_created: false,
                    cover: None,
                    status: AlbumStatus::Skipped {
                        error: e.to_string(),
                    },
                });
                continue;
            }
        };

        let (images, status) = match scan_album(&folder, &spec.id, &config.web_prefix) {
            Ok(images) => {
                let image_count = images.len();
                (images, AlbumStatus::Scanned { image_count })
            }
            Err(e) => (
                Vec::new(),
                AlbumStatus::ScanFailed {
                    error: e.to_string(),
                },
            ),
        };

        let entry = merge_album(spec, prior.get(&spec.id), images, &config.placeholder_cover);
        albums.push(AlbumReport {
            id: spec.id.clone(),
            title: entry.title.clone(),
            folder_created,
            cover: Some(entry.cover.clone()),
            status,
        });
        entries.push(entry);
    }

    write_manifest(&config.manifest, &entries)?;

    Ok(GalleryReport {
        manifest: config.manifest.clone(),
        entries,
        albums,
        prior_malformed: prior.malformed,
    })
}

/// Read and parse the previous manifest.
pub fn load_prior(path: &Path) -> Result<PriorManifest, GalleryError> {
    let bytes = fs::read(path)?;
    Ok(PriorManifest::parse(&bytes))
}

/// Create the album folder when nothing exists at that path.
///
/// Returns whether it was created. An existing non-directory is left alone;
/// listing it fails later and the album is written without images.
pub fn ensure_folder(folder: &Path) -> io::Result<bool> {
    if folder.exists() {
        return Ok(false);
    }
    fs::create_dir_all(folder)?;
    Ok(true)
}

/// List the images directly inside `folder` as sorted web paths.
pub fn scan_album(folder: &Path, id: &str, web_prefix: &str) -> io::Result<Vec<String>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_gallery_image(&path) {
            continue;
        }
        let name = entry.file_name();
        images.push(web_path(web_prefix, id, &name.to_string_lossy()));
    }
    images.sort();
    Ok(images)
}

/// Whether the path has one of the [`GALLERY_EXTENSIONS`].
pub fn is_gallery_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            GALLERY_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// `<prefix>/<album id>/<file name>`, without doubled or leading slashes.
pub fn web_path(prefix: &str, id: &str, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        format!("{}/{}", id, file_name)
    } else {
        format!("{}/{}/{}", prefix, id, file_name)
    }
}

/// Default description for an album with no stored one.
pub fn default_description(name: &str) -> String {
    format!("Collection of {}.", name.to_lowercase())
}

/// Whether a cover is still the placeholder.
///
/// Matches an empty cover, the configured placeholder path exactly, and any
/// path containing [`PLACEHOLDER_MARKER`] (so a relocated
/// `album_placeholder.png` still counts).
pub fn is_placeholder(cover: &str, placeholder: &str) -> bool {
    cover.is_empty() || cover == placeholder || cover.contains(PLACEHOLDER_MARKER)
}

/// Combine the configured album, its previous entry and a fresh image list.
///
/// `images` must already be sorted.
pub fn merge_album(
    spec: &AlbumSpec,
    prior: Option<&StoredAlbum>,
    images: Vec<String>,
    placeholder: &str,
) -> AlbumEntry {
    let title = prior
        .and_then(|p| p.title.clone())
        .unwrap_or_else(|| spec.name.clone());
    let description = prior
        .and_then(|p| p.description.clone())
        .unwrap_or_else(|| default_description(&spec.name));
    let mut cover = prior
        .and_then(|p| p.cover.clone())
        .unwrap_or_else(|| placeholder.to_string());

    if let Some(first) = images.first() {
        if is_placeholder(&cover, placeholder) {
            cover = first.clone();
        }
    }

    AlbumEntry {
        id: spec.id.clone(),
        title,
        description,
        cover,
        images,
    }
}

/// Overwrite the manifest with `entries` as 2-space indented JSON.
pub fn write_manifest(path: &Path, entries: &[AlbumEntry]) -> Result<(), GalleryError> {
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json)?;
    Ok(())
}

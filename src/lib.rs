//! # Portfolio Assets
//!
//! Asset maintenance for a static portfolio site. Independent tools share one
//! configuration file and one output style:
//!
//! ```text
//! optimize   assets/img/**.{png,jpg,jpeg}  →  sibling .webp (or .avif) files
//! gallery    assets/img/gallery/<album>/   →  assets/data/images.json
//! blogs      blog/*.{html,htm}             →  blogs.json
//! images     images/*                      →  images.json
//! ```
//!
//! Neither tool keeps state between runs. The converter decides what to redo
//! by comparing modification times; the gallery builder re-derives image lists
//! from disk and carries hand-edited fields over from the previous manifest.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`optimize`] | Walks the asset tree and converts each stale source image |
//! | [`gallery`] | Rescans album folders and rewrites the gallery manifest |
//! | [`blogs`] | Extracts title and excerpt from each blog page into an index |
//! | [`image_list`] | Lists the image files of one directory |
//! | [`config`] | `portfolio.toml` loading, stock defaults, validation |
//! | [`imaging`] | Decode/encode behind the [`imaging::ImageBackend`] trait |
//! | [`output`] | CLI output formatting for both tools |
//!
//! # Design Decisions
//!
//! ## Lossy WebP Through libwebp
//!
//! The `image` crate decodes everything the site uses but only writes lossless
//! WebP, which is usually larger than the JPEG it replaces. Encoding goes
//! through the `webp` crate so the configured quality actually applies. AVIF
//! output is available as an alternative and stays pure Rust (rav1e).
//!
//! ## Per-File Failures Never Abort
//!
//! A corrupt or unreadable image is reported as a failed outcome and the run
//! moves on. Only conditions that would make every file fail (a missing source
//! directory, a missing codec) stop the converter up front.
//!
//! ## The Manifest Must Already Exist
//!
//! The gallery builder refuses to create the manifest from scratch. A missing
//! file almost always means the tool was run from the wrong directory, so the
//! builder reports it and returns without touching the disk. This is not a
//! failed run: the exit status stays 0.

pub mod blogs;
pub mod config;
pub mod gallery;
pub mod image_list;
pub mod imaging;
pub mod optimize;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;

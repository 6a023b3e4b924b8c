//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: inspect (read the source's channel layout) and encode (decode,
//! convert to the requested layout, write the target format).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::EncodeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Channel layout of a source image, as stored on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceLayout {
    /// The decoded pixels carry an alpha channel.
    pub has_alpha: bool,
    /// The file stores palette indices (PNG color type 3).
    pub indexed: bool,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Read the source's channel layout without decoding pixel data.
    fn inspect(&self, path: &Path) -> Result<SourceLayout, BackendError>;

    /// Decode the source, convert it to `params.color`, and write `params.output`.
    fn encode(&self, params: &EncodeParams) -> Result<(), BackendError>;
}

//! Image conversion: decoding via the `image` crate, encoding to WebP or AVIF.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Inspect** | `ImageDecoder::color_type` + PNG IHDR color type |
//! | **Encode → WebP** | libwebp through the `webp` crate |
//! | **Encode → AVIF** | `image::codecs::avif::AvifEncoder` (rav1e) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for color layout and savings math (unit testable)
//! - **Parameters**: Data structures describing a conversion
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub(crate) mod png_header;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, SourceLayout};
pub use calculations::{choose_color_target, size_savings};
pub use operations::{convert_image, plan_conversion};
pub use params::{ColorTarget, EncodeParams, OutputFormat, Quality};
pub use rust_backend::{RustBackend, missing_codecs};

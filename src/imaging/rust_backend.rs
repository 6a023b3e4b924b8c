//! Pure Rust image processing backend, plus libwebp for lossy WebP.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | Channel layout | `ImageDecoder::color_type` + IHDR read for palette PNGs |
//! | Encode → WebP | `webp::Encoder` (libwebp, lossy at the configured quality) |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |

use super::backend::{BackendError, ImageBackend, SourceLayout};
use super::params::{ColorTarget, EncodeParams, OutputFormat};
use super::png_header;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::path::Path;

/// Decoders the converter cannot run without.
const REQUIRED_DECODERS: &[(&str, ImageFormat)] =
    &[("PNG", ImageFormat::Png), ("JPEG", ImageFormat::Jpeg)];

/// Codecs needed for `format` that are not compiled into this build.
///
/// Empty when everything is available. WebP encoding goes through libwebp,
/// which is always linked.
pub fn missing_codecs(format: OutputFormat) -> Vec<String> {
    let mut missing: Vec<String> = REQUIRED_DECODERS
        .iter()
        .filter(|(_, fmt)| !fmt.reading_enabled())
        .map(|(name, _)| format!("{name} decoder"))
        .collect();
    if format == OutputFormat::Avif && !ImageFormat::Avif.writing_enabled() {
        missing.push("AVIF encoder".to_string());
    }
    missing
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, sniffing the format from its contents.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save a DynamicImage in the requested format and channel layout.
///
/// A failed encode never leaves a partial file behind: a stale output with a
/// fresh mtime would be mistaken for an up-to-date conversion on the next run.
fn save_image(img: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError> {
    let result = match params.format {
        OutputFormat::Webp => save_webp(img, &params.output, params.quality.value(), params.color),
        OutputFormat::Avif => save_avif(img, &params.output, params.quality.value(), params.color),
    };
    if result.is_err() && params.output.exists() {
        let _ = std::fs::remove_file(&params.output);
    }
    result
}

/// Encode lossy WebP through libwebp and write it out in one go.
fn save_webp(
    img: &DynamicImage,
    path: &Path,
    quality: u32,
    color: ColorTarget,
) -> Result<(), BackendError> {
    let encoded = match color {
        ColorTarget::Rgba => {
            let rgba = img.to_rgba8();
            let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
            encoder.encode_simple(false, quality as f32)
        }
        ColorTarget::Rgb => {
            let rgb = img.to_rgb8();
            let encoder = webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height());
            encoder.encode_simple(false, quality as f32)
        }
    }
    .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {e:?}")))?;

    std::fs::write(path, &*encoded)?;
    Ok(())
}

/// Encode and save as AVIF using rav1e (speed=6 for reasonable throughput).
fn save_avif(
    img: &DynamicImage,
    path: &Path,
    quality: u32,
    color: ColorTarget,
) -> Result<(), BackendError> {
    let converted = match color {
        ColorTarget::Rgba => DynamicImage::ImageRgba8(img.to_rgba8()),
        ColorTarget::Rgb => DynamicImage::ImageRgb8(img.to_rgb8()),
    };
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let encoder =
        image::codecs::avif::AvifEncoder::new_with_speed_quality(writer, 6, quality as u8);
    converted
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("AVIF encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn inspect(&self, path: &Path) -> Result<SourceLayout, BackendError> {
        let decoder = ImageReader::open(path)?
            .with_guessed_format()?
            .into_decoder()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(SourceLayout {
            has_alpha: decoder.color_type().has_alpha(),
            indexed: png_header::is_indexed_png(path),
        })
    }

    fn encode(&self, params: &EncodeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        save_image(&img, params)
    }
}

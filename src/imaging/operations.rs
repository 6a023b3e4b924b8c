//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::choose_color_target;
use super::params::{ColorTarget, EncodeParams, OutputFormat, Quality};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan a conversion without executing it: inspect the source and pick the
/// channel layout for the encoder.
pub fn plan_conversion(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    format: OutputFormat,
    quality: Quality,
) -> Result<EncodeParams> {
    let layout = backend.inspect(source)?;
    Ok(EncodeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        format,
        quality,
        color: choose_color_target(layout),
    })
}

/// Convert `source` into `output` in the given format.
///
/// Returns the channel layout that was encoded.
pub fn convert_image(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    format: OutputFormat,
    quality: Quality,
) -> Result<ColorTarget> {
    let params = plan_conversion(backend, source, output, format, quality)?;
    backend.encode(&params)?;
    Ok(params.color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::SourceLayout;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    #[test]
    fn plan_opaque_source_as_rgb() {
        let backend = MockBackend::new();
        let params = plan_conversion(
            &backend,
            Path::new("/photo.jpg"),
            Path::new("/photo.webp"),
            OutputFormat::Webp,
            Quality::new(85),
        )
        .unwrap();

        assert_eq!(params.color, ColorTarget::Rgb);
        assert_eq!(params.quality.value(), 85);
        // Planning does not encode
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn plan_palette_source_as_rgba() {
        let backend = MockBackend::new().with_layout(
            "/icon.png",
            SourceLayout {
                has_alpha: false,
                indexed: true,
            },
        );
        let params = plan_conversion(
            &backend,
            Path::new("/icon.png"),
            Path::new("/icon.webp"),
            OutputFormat::Webp,
            Quality::default(),
        )
        .unwrap();

        assert_eq!(params.color, ColorTarget::Rgba);
    }

    #[test]
    fn convert_inspects_then_encodes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("logo.png");
        let output = tmp.path().join("logo.avif");
        let backend = MockBackend::new().with_layout(
            source.clone(),
            SourceLayout {
                has_alpha: true,
                indexed: false,
            },
        );

        let color = convert_image(&backend, &source, &output, OutputFormat::Avif, Quality::new(60))
            .unwrap();
        assert_eq!(color, ColorTarget::Rgba);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], RecordedOp::Inspect(_)));
        assert!(matches!(
            &ops[1],
            RecordedOp::Encode {
                format: OutputFormat::Avif,
                quality: 60,
                color: ColorTarget::Rgba,
                ..
            }
        ));
    }

    #[test]
    fn convert_propagates_encode_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("bad.png");
        let backend = MockBackend::new().failing_on(source.clone());

        let result = convert_image(
            &backend,
            &source,
            &tmp.path().join("bad.webp"),
            OutputFormat::Webp,
            Quality::default(),
        );
        assert!(result.is_err());
    }
}

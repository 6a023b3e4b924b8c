//! Pure calculation functions for image conversion.
//!
//! No I/O: these are the decisions the converter makes around the encoder,
//! kept separate so they can be unit tested directly.

use super::backend::SourceLayout;
use super::params::ColorTarget;

/// Decide which channel layout the encoder receives.
///
/// Sources with alpha, and palette sources (whose palette may carry
/// transparency), keep an alpha channel. Everything else is flattened to RGB,
/// which encodes smaller.
pub fn choose_color_target(layout: SourceLayout) -> ColorTarget {
    if layout.has_alpha || layout.indexed {
        ColorTarget::Rgba
    } else {
        ColorTarget::Rgb
    }
}

/// Percentage of bytes saved by the conversion.
///
/// Positive when the output is smaller, negative when it grew. `None` for an
/// empty source, where a ratio is meaningless.
pub fn size_savings(original: u64, converted: u64) -> Option<f64> {
    if original == 0 {
        return None;
    }
    Some((original as f64 - converted as f64) / original as f64 * 100.0)
}

//! Minimal PNG header reader.
//!
//! The `image` crate expands palette PNGs to RGB/RGBA while decoding, so the
//! fact that a file stored palette indices is gone by the time pixels are
//! available. This reads the IHDR chunk directly to recover it.
//!
//! Layout of the first 26 bytes of every PNG:
//!
//! ```text
//! 0..8    signature  89 50 4E 47 0D 0A 1A 0A
//! 8..12   IHDR length (always 13)
//! 12..16  "IHDR"
//! 16..24  width, height (big-endian u32)
//! 24      bit depth
//! 25      color type (0 gray, 2 RGB, 3 indexed, 4 gray+alpha, 6 RGBA)
//! ```

use std::io::Read;
use std::path::Path;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// PNG color type for palette-indexed images.
pub const COLOR_TYPE_INDEXED: u8 = 3;

/// Parse the IHDR color type out of the leading bytes of a PNG.
pub fn color_type_from_bytes(bytes: &[u8]) -> Option<u8> {
    if bytes.len() < 26 || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }
    Some(bytes[25])
}

/// Read the IHDR color type of a PNG file.
/// Returns `None` for non-PNG files and on any read failure.
pub fn read_color_type(path: &Path) -> Option<u8> {
    let mut header = [0u8; 26];
    let mut file = std::fs::File::open(path).ok()?;
    file.read_exact(&mut header).ok()?;
    color_type_from_bytes(&header)
}

/// Whether the file is a PNG storing palette indices.
pub fn is_indexed_png(path: &Path) -> bool {
    read_color_type(path) == Some(COLOR_TYPE_INDEXED)
}

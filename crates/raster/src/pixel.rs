//! Conversion from composited colors to an RGBA8 byte buffer.
//!
//! Always available (no feature gate) so callers that hand bytes to a
//! display surface do not need the `png` feature.

use isoline_core::Rgba;

/// Quantizes colors to interleaved RGBA8 bytes with rounding.
///
/// The buffer length is `pixels.len() * 4`. Alpha is taken from each color.
pub fn to_rgba8(pixels: &[Rgba]) -> Vec<u8> {
    pixels.iter().flat_map(|p| p.to_rgba8()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoline_core::{Composite, OutlineCompositor};

    #[test]
    fn to_rgba8_correct_length() {
        let buf = to_rgba8(&[Rgba::BLACK; 12]);
        assert_eq!(buf.len(), 48);
    }

    #[test]
    fn to_rgba8_interleaves_channels() {
        let buf = to_rgba8(&[Rgba::RED, Rgba::new(0.0, 1.0, 0.5, 0.0)]);
        assert_eq!(buf, vec![255, 0, 0, 255, 0, 255, 128, 0]);
    }

    #[test]
    fn outline_sample_quantizes_to_expected_bytes() {
        let color = OutlineCompositor::default().composite(0.45);
        assert_eq!(to_rgba8(&[color]), vec![147, 20, 20, 255]);
    }
}

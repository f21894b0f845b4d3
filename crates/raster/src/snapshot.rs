//! PNG output of a composited image.
//!
//! Feature-gated behind `png` (default on) so that consumers who only need
//! the pixel grid do not pull in the `image` crate. Byte conversion lives in
//! [`crate::pixel`].

use std::path::Path;

use isoline_core::{CompositeError, Rgba};

use crate::pixel::to_rgba8;

/// Writes a row-major `width x height` image as an 8-bit RGBA PNG.
///
/// Returns `CompositeError::DimensionMismatch` if `pixels` does not hold
/// exactly `width * height` colors, `CompositeError::InvalidDimensions` if a
/// dimension is zero or overflows `u32`, or `CompositeError::Io` on write
/// failure.
pub fn write_png(
    width: usize,
    height: usize,
    pixels: &[Rgba],
    path: &Path,
) -> Result<(), CompositeError> {
    if width == 0 || height == 0 {
        return Err(CompositeError::InvalidDimensions);
    }
    let expected = width
        .checked_mul(height)
        .ok_or(CompositeError::InvalidDimensions)?;
    if pixels.len() != expected {
        return Err(CompositeError::DimensionMismatch {
            width,
            height,
            expected,
            got: pixels.len(),
        });
    }
    let w = u32::try_from(width).map_err(|_| CompositeError::InvalidDimensions)?;
    let h = u32::try_from(height).map_err(|_| CompositeError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, to_rgba8(pixels))
        .ok_or_else(|| CompositeError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| CompositeError::Io(e.to_string()))?;
    log::info!("wrote {width}x{height} PNG to {}", path.display());
    Ok(())
}

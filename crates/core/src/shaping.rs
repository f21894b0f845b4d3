//! Scalar shaping functions shared by every compositor.
//!
//! `smoothstep` produces the soft fill ramp, `cubic_pulse` the symmetric bump
//! that carves an outline band around an isovalue. Both use the same cubic
//! Hermite falloff `t²(3 - 2t)`, so a pulse centered on the ramp midpoint with
//! half the ramp width lands exactly on the soft edge.

use crate::error::CompositeError;

/// Cubic Hermite ramp: 0 for `x <= lo`, 1 for `x >= hi`, `3t² - 2t³` between.
///
/// Requires `lo < hi`; configurations are validated before reaching here.
#[inline]
pub fn smoothstep(lo: f64, hi: f64, x: f64) -> f64 {
    let t = ((x - lo) / (hi - lo)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Symmetric smooth bump: 1 at `center`, 0 at and beyond `center ± half_width`.
///
/// Inside the band, with `t = |x - center| / half_width`, the weight is
/// `1 - t²(3 - 2t)`. Value and first derivative are continuous at both edges.
///
/// `half_width` must be strictly positive. This is only checked in debug
/// builds; use [`CubicPulse::new`] to validate at configuration time.
#[inline]
pub fn cubic_pulse(center: f64, half_width: f64, x: f64) -> f64 {
    debug_assert!(half_width > 0.0, "cubic_pulse half_width must be > 0");
    let dist = (x - center).abs();
    if dist > half_width {
        return 0.0;
    }
    let t = dist / half_width;
    1.0 - t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation `a·(1 - t) + b·t`.
#[inline]
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// A validated cubic pulse band.
///
/// Construction rejects non-finite parameters and non-positive half-widths so
/// that [`CubicPulse::weight`] can stay branch-light on the per-pixel path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPulse {
    center: f64,
    half_width: f64,
}

impl CubicPulse {
    /// Creates a pulse centered at `center` with the given `half_width`.
    ///
    /// Returns `CompositeError::InvalidPulseWidth` if `half_width` is not a
    /// finite positive number, or `CompositeError::InvalidParams` if `center`
    /// is not finite.
    pub fn new(center: f64, half_width: f64) -> Result<Self, CompositeError> {
        if !center.is_finite() {
            return Err(CompositeError::InvalidParams(format!(
                "pulse center must be finite, got {center}"
            )));
        }
        if !(half_width.is_finite() && half_width > 0.0) {
            return Err(CompositeError::InvalidPulseWidth(half_width));
        }
        Ok(Self { center, half_width })
    }

    /// Skips validation; only for compile-time constants known to be valid.
    pub(crate) const fn new_unchecked(center: f64, half_width: f64) -> Self {
        Self { center, half_width }
    }

    /// Center of the band.
    pub fn center(&self) -> f64 {
        self.center
    }

    /// Half-width of the band.
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Closed support `[center - half_width, center + half_width]`.
    pub fn support(&self) -> (f64, f64) {
        (self.center - self.half_width, self.center + self.half_width)
    }

    /// Pulse weight at `x`.
    #[inline]
    pub fn weight(&self, x: f64) -> f64 {
        cubic_pulse(self.center, self.half_width, x)
    }
}

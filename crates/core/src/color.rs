//! RGBA color value produced by every compositor.
//!
//! Channels are `f64` in [0, 1]. Interpolation goes through `glam::DVec4` so
//! the CPU path blends with the same `a·(1 - t) + b·t` form as GLSL `mix`.

use glam::DVec4;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CompositeError;

/// Straight (non-premultiplied) RGBA color with channels in [0, 1].
///
/// Serializes as a hex string `"#rrggbbaa"`. Parsing also accepts the
/// six-digit `"#rrggbb"` form, which is treated as fully opaque. The hex
/// form holds 8 bits per channel, so a channel that is not a multiple of
/// 1/255 comes back rounded to the nearest step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque pure red, the default outline accent.
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray `(v, v, v, 1)`.
    pub const fn gray(v: f64) -> Self {
        Self::new(v, v, v, 1.0)
    }

    pub fn to_dvec4(self) -> DVec4 {
        DVec4::new(self.r, self.g, self.b, self.a)
    }

    pub fn from_dvec4(v: DVec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }

    /// Linear interpolation `self·(1 - t) + other·t` on all four channels.
    #[inline]
    pub fn mix(self, other: Rgba, t: f64) -> Rgba {
        Rgba::from_dvec4(self.to_dvec4() * (1.0 - t) + other.to_dvec4() * t)
    }

    /// Returns true if every channel lies in [0, 1].
    pub fn is_in_range(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }

    /// Quantizes to 8-bit channels with rounding, clamping out-of-range values.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// Parses `"#rrggbb"`, `"rrggbb"`, `"#rrggbbaa"` or `"rrggbbaa"`
    /// (case insensitive).
    ///
    /// Returns `CompositeError::InvalidColor` for any other input.
    pub fn from_hex(hex: &str) -> Result<Rgba, CompositeError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(CompositeError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got {}",
                hex.len()
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            hex.get(range)
                .ok_or_else(|| CompositeError::InvalidColor(format!("invalid {name} component")))
                .and_then(|s| {
                    u8::from_str_radix(s, 16).map_err(|e| {
                        CompositeError::InvalidColor(format!("invalid {name} component: {e}"))
                    })
                })
                .map(|v| v as f64 / 255.0)
        };
        let r = channel(0..2, "red")?;
        let g = channel(2..4, "green")?;
        let b = channel(4..6, "blue")?;
        let a = if hex.len() == 8 {
            channel(6..8, "alpha")?
        } else {
            1.0
        };
        Ok(Rgba::new(r, g, b, a))
    }

    /// Formats as `"#rrggbbaa"` with 8-bit quantization.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

fn quantize(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

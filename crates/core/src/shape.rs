//! Analytic field shapes used as stand-ins for a sampled texture.
//!
//! Each [`Shape`] is a [`FieldSampler`]: it evaluates a scalar in [0, 1] at
//! any normalized `(u, v)`, so it can feed a compositor directly or be baked
//! into a [`Field`] with [`Shape::rasterize`].
//!
//! All shapes are deterministic: same parameters, same output.

use std::fmt;

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compositor::decode_params;
use crate::error::CompositeError;
use crate::field::{texel_center, Field, FieldSampler};

/// Shape names accepted by [`Shape::from_name`].
const SHAPE_NAMES: &[&str] = &["gradient", "disc", "noise"];

/// Horizontal ramp from `from` at `u = 0` to `to` at `u = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradientShape {
    pub from: f64,
    pub to: f64,
}

impl Default for GradientShape {
    fn default() -> Self {
        Self { from: 0.0, to: 1.0 }
    }
}

/// Filled disc whose value crosses 0.5 exactly on its rim.
///
/// The value is 1 well inside, 0 well outside, and falls linearly across a
/// band of width `softness` centered on the rim, so the rim is the 0.5
/// isoline the outline material highlights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscShape {
    pub center_u: f64,
    pub center_v: f64,
    pub radius: f64,
    pub softness: f64,
}

impl Default for DiscShape {
    fn default() -> Self {
        Self {
            center_u: 0.5,
            center_v: 0.5,
            radius: 0.3,
            softness: 0.2,
        }
    }
}

impl DiscShape {
    fn validate(&self) -> Result<(), CompositeError> {
        if !(self.center_u.is_finite() && self.center_v.is_finite()) {
            return Err(CompositeError::InvalidParams(
                "disc center must be finite".to_string(),
            ));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(CompositeError::InvalidParams(format!(
                "disc radius must be >= 0, got {}",
                self.radius
            )));
        }
        if !(self.softness.is_finite() && self.softness > 0.0) {
            return Err(CompositeError::InvalidParams(format!(
                "disc softness must be > 0, got {}",
                self.softness
            )));
        }
        Ok(())
    }
}

/// Parameters of the fractal Perlin shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseParams {
    pub scale: f64,
    pub seed: u32,
    pub octaves: u32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 4.0,
            seed: 0,
            octaves: 3,
        }
    }
}

/// Fractal Perlin noise remapped from [-1, 1] to [0, 1].
///
/// Octaves double in frequency and halve in amplitude; the sum is normalized
/// by the total amplitude before remapping.
pub struct NoiseShape {
    params: NoiseParams,
    noise: Perlin,
}

impl NoiseShape {
    pub fn new(params: NoiseParams) -> Result<Self, CompositeError> {
        if !(params.scale.is_finite() && params.scale > 0.0) {
            return Err(CompositeError::InvalidParams(format!(
                "noise scale must be > 0, got {}",
                params.scale
            )));
        }
        if params.octaves == 0 || params.octaves > 16 {
            return Err(CompositeError::InvalidParams(format!(
                "noise octaves must be in 1..=16, got {}",
                params.octaves
            )));
        }
        Ok(Self {
            params,
            noise: Perlin::new(params.seed),
        })
    }

    pub fn params(&self) -> NoiseParams {
        self.params
    }
}

impl fmt::Debug for NoiseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseShape")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Closed set of analytic shapes.
#[derive(Debug)]
pub enum Shape {
    Gradient(GradientShape),
    Disc(DiscShape),
    Noise(NoiseShape),
}

impl Shape {
    /// Constructs a shape by name from a JSON parameter object.
    ///
    /// Missing keys fall back to defaults. Returns
    /// `CompositeError::UnknownShape` for unrecognized names and
    /// `CompositeError::InvalidParams` for malformed parameters.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, CompositeError> {
        match name {
            "gradient" => Ok(Shape::Gradient(decode_params(params)?)),
            "disc" => {
                let disc: DiscShape = decode_params(params)?;
                disc.validate()?;
                Ok(Shape::Disc(disc))
            }
            "noise" => Ok(Shape::Noise(NoiseShape::new(decode_params(params)?)?)),
            _ => Err(CompositeError::UnknownShape(name.to_string())),
        }
    }

    /// Returns a slice of all recognized shape names.
    pub fn list_names() -> &'static [&'static str] {
        SHAPE_NAMES
    }

    /// Bakes the shape into a `width x height` field, sampling texel centers.
    pub fn rasterize(&self, width: usize, height: usize) -> Result<Field, CompositeError> {
        let mut field = Field::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let uv = texel_center(x, y, width, height);
                field.set(x as isize, y as isize, self.sample(uv.x, uv.y));
            }
        }
        Ok(field)
    }
}

impl FieldSampler for Shape {
    fn sample(&self, u: f64, v: f64) -> f64 {
        let d = match self {
            Shape::Gradient(g) => g.from + (g.to - g.from) * u,
            Shape::Disc(disc) => {
                let du = u - disc.center_u;
                let dv = v - disc.center_v;
                let dist = (du * du + dv * dv).sqrt();
                0.5 - (dist - disc.radius) / disc.softness
            }
            Shape::Noise(n) => {
                let (sum, norm, _, _) = (0..n.params.octaves).fold(
                    (0.0, 0.0, 1.0, n.params.scale),
                    |(sum, norm, amp, freq), _| {
                        (
                            sum + n.noise.get([u * freq, v * freq]) * amp,
                            norm + amp,
                            amp * 0.5,
                            freq * 2.0,
                        )
                    },
                );
                0.5 + 0.5 * sum / norm
            }
        };
        if d.is_nan() {
            0.0
        } else {
            d.clamp(0.0, 1.0)
        }
    }
}

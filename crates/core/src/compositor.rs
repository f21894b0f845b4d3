//! Per-pixel compositors: scalar field sample in, RGBA color out.
//!
//! Two materials exist. [`OutlineCompositor`] turns the sample into a soft
//! grayscale fill via `smoothstep` and paints an accent-colored band around
//! the fill's midpoint using a [`CubicPulse`]. [`TintCompositor`] is the
//! degenerate member of the family: it copies the sample into red and green
//! and fills blue and alpha with constants.
//!
//! Every compositor is a pure, `Copy` value. Build it once from a validated
//! configuration, then call [`Composite::composite`] from any number of
//! threads.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgba;
use crate::error::CompositeError;
use crate::shaping::{smoothstep, CubicPulse};

/// Material names accepted by [`Compositor::from_name`].
const MATERIAL_NAMES: &[&str] = &["outline", "tint"];

/// Lower edge of the default fill transition.
pub const DEFAULT_FILL_LO: f64 = 0.4;
/// Upper edge of the default fill transition.
pub const DEFAULT_FILL_HI: f64 = 0.6;
/// Isovalue highlighted by the default outline band.
pub const DEFAULT_PULSE_CENTER: f64 = 0.5;
/// Half-width of the default outline band.
pub const DEFAULT_PULSE_HALF_WIDTH: f64 = 0.1;
/// Constant blue channel of the tint material.
pub const DEFAULT_TINT_BLUE: f64 = 0.5;
/// Constant alpha channel of the tint material.
pub const DEFAULT_TINT_ALPHA: f64 = 1.0;

/// Contract shared by every material: one sample in, one color out.
pub trait Composite {
    fn composite(&self, sample: f64) -> Rgba;
}

/// Tunable constants of the outline material.
///
/// The defaults reproduce the reference look: fill ramp over [0.4, 0.6],
/// outline band centered at 0.5 with half-width 0.1, opaque red accent.
/// Deserializing a partial JSON object overrides only the named fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutlineConfig {
    pub fill_lo: f64,
    pub fill_hi: f64,
    pub pulse_center: f64,
    pub pulse_half_width: f64,
    pub accent: Rgba,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            fill_lo: DEFAULT_FILL_LO,
            fill_hi: DEFAULT_FILL_HI,
            pulse_center: DEFAULT_PULSE_CENTER,
            pulse_half_width: DEFAULT_PULSE_HALF_WIDTH,
            accent: Rgba::RED,
        }
    }
}

impl OutlineConfig {
    /// Checks the fill band and pulse parameters.
    ///
    /// Returns `CompositeError::InvalidFillBand` unless both edges are finite
    /// with `fill_lo < fill_hi`, `CompositeError::InvalidPulseWidth` if
    /// the half-width is not a finite positive number, and
    /// `CompositeError::InvalidColor` if an accent channel leaves [0, 1].
    pub fn validate(&self) -> Result<(), CompositeError> {
        self.fill_band()?;
        self.pulse()?;
        if !self.accent.is_in_range() {
            return Err(CompositeError::InvalidColor(format!(
                "accent {:?} has channels outside [0, 1]",
                self.accent
            )));
        }
        Ok(())
    }

    /// Returns true if the outline band `[c - w, c + w]` lies inside the fill
    /// transition `[fill_lo, fill_hi]`.
    ///
    /// When this does not hold the outline can show up deep inside or
    /// outside the silhouette instead of riding on its soft edge.
    pub fn outline_within_fill_band(&self) -> bool {
        let lo = self.pulse_center - self.pulse_half_width;
        let hi = self.pulse_center + self.pulse_half_width;
        // Tolerate the rounding in e.g. 0.5 - 0.1 vs 0.4.
        let slack = 1e-9;
        lo >= self.fill_lo - slack && hi <= self.fill_hi + slack
    }

    fn fill_band(&self) -> Result<(f64, f64), CompositeError> {
        let (lo, hi) = (self.fill_lo, self.fill_hi);
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(CompositeError::InvalidFillBand { lo, hi });
        }
        Ok((lo, hi))
    }

    fn pulse(&self) -> Result<CubicPulse, CompositeError> {
        CubicPulse::new(self.pulse_center, self.pulse_half_width)
    }
}

/// Tunable constants of the tint material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TintConfig {
    pub blue: f64,
    pub alpha: f64,
}

impl Default for TintConfig {
    fn default() -> Self {
        Self {
            blue: DEFAULT_TINT_BLUE,
            alpha: DEFAULT_TINT_ALPHA,
        }
    }
}

impl TintConfig {
    /// Returns `CompositeError::InvalidChannel` if either constant is outside
    /// [0, 1] or not finite.
    pub fn validate(&self) -> Result<(), CompositeError> {
        for (name, value) in [("blue", self.blue), ("alpha", self.alpha)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CompositeError::InvalidChannel {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Intermediate values of one outline evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlineSample {
    /// Grayscale fill level from the smoothstep ramp.
    pub fill: f64,
    /// Outline band weight from the cubic pulse.
    pub outline: f64,
    /// Final blended color.
    pub color: Rgba,
}

/// Soft fill mask with an accent outline band around the fill midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineCompositor {
    fill_lo: f64,
    fill_hi: f64,
    pulse: CubicPulse,
    accent: Rgba,
}

impl OutlineCompositor {
    /// Builds a compositor from a validated configuration.
    ///
    /// Logs a warning when the outline band is not contained in the fill
    /// transition; the configuration is still accepted.
    pub fn new(config: OutlineConfig) -> Result<Self, CompositeError> {
        config.validate()?;
        let (fill_lo, fill_hi) = config.fill_band()?;
        let pulse = config.pulse()?;
        if !config.outline_within_fill_band() {
            warn!(
                "outline band [{}, {}] extends past fill transition [{fill_lo}, {fill_hi}]",
                pulse.support().0,
                pulse.support().1,
            );
        }
        Ok(Self {
            fill_lo,
            fill_hi,
            pulse,
            accent: config.accent,
        })
    }

    pub fn config(&self) -> OutlineConfig {
        OutlineConfig {
            fill_lo: self.fill_lo,
            fill_hi: self.fill_hi,
            pulse_center: self.pulse.center(),
            pulse_half_width: self.pulse.half_width(),
            accent: self.accent,
        }
    }

    /// Grayscale fill level for `d`.
    #[inline]
    pub fn fill(&self, d: f64) -> f64 {
        smoothstep(self.fill_lo, self.fill_hi, d)
    }

    /// Outline band weight for `d`.
    #[inline]
    pub fn outline(&self, d: f64) -> f64 {
        self.pulse.weight(d)
    }

    /// Evaluates fill, outline and final color for `d`.
    pub fn evaluate(&self, d: f64) -> OutlineSample {
        let fill = self.fill(d);
        let outline = self.outline(d);
        OutlineSample {
            fill,
            outline,
            color: Rgba::gray(fill).mix(self.accent, outline),
        }
    }
}

impl Default for OutlineCompositor {
    fn default() -> Self {
        Self {
            fill_lo: DEFAULT_FILL_LO,
            fill_hi: DEFAULT_FILL_HI,
            pulse: CubicPulse::new_unchecked(DEFAULT_PULSE_CENTER, DEFAULT_PULSE_HALF_WIDTH),
            accent: Rgba::RED,
        }
    }
}

impl Composite for OutlineCompositor {
    #[inline]
    fn composite(&self, sample: f64) -> Rgba {
        Rgba::gray(self.fill(sample)).mix(self.accent, self.outline(sample))
    }
}

/// Flat two-channel tint: `c -> (c, c, blue, alpha)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintCompositor {
    blue: f64,
    alpha: f64,
}

impl TintCompositor {
    pub fn new(config: TintConfig) -> Result<Self, CompositeError> {
        config.validate()?;
        Ok(Self {
            blue: config.blue,
            alpha: config.alpha,
        })
    }

    pub fn config(&self) -> TintConfig {
        TintConfig {
            blue: self.blue,
            alpha: self.alpha,
        }
    }
}

impl Default for TintCompositor {
    fn default() -> Self {
        Self {
            blue: DEFAULT_TINT_BLUE,
            alpha: DEFAULT_TINT_ALPHA,
        }
    }
}

impl Composite for TintCompositor {
    #[inline]
    fn composite(&self, sample: f64) -> Rgba {
        Rgba::new(sample, sample, self.blue, self.alpha)
    }
}

/// Closed set of materials, selected per draw.
///
/// Use [`Compositor::from_name`] for string-based construction (CLI).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Compositor {
    /// Smooth threshold fill with accent outline.
    Outline(OutlineCompositor),
    /// Flat `(c, c, blue, alpha)` tint.
    Tint(TintCompositor),
}

impl Compositor {
    /// Constructs a material by name from a JSON parameter object.
    ///
    /// Missing keys fall back to defaults; unknown keys or wrong types fail
    /// with `CompositeError::InvalidParams`. Returns
    /// `CompositeError::UnknownMaterial` if the name is not recognized.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, CompositeError> {
        match name {
            "outline" => Ok(Compositor::Outline(OutlineCompositor::new(decode_params(
                params,
            )?)?)),
            "tint" => Ok(Compositor::Tint(TintCompositor::new(decode_params(
                params,
            )?)?)),
            _ => Err(CompositeError::UnknownMaterial(name.to_string())),
        }
    }

    /// Returns a slice of all recognized material names.
    pub fn list_names() -> &'static [&'static str] {
        MATERIAL_NAMES
    }

    /// The registry name of this material.
    pub fn name(&self) -> &'static str {
        match self {
            Compositor::Outline(_) => "outline",
            Compositor::Tint(_) => "tint",
        }
    }

    /// Current configuration as a JSON object.
    pub fn params(&self) -> Value {
        let encoded = match self {
            Compositor::Outline(c) => serde_json::to_value(c.config()),
            Compositor::Tint(c) => serde_json::to_value(c.config()),
        };
        // Plain structs of f64 and hex strings always encode.
        encoded.unwrap_or(Value::Null)
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Compositor::Outline(OutlineCompositor::default())
    }
}

impl Composite for Compositor {
    #[inline]
    fn composite(&self, sample: f64) -> Rgba {
        match self {
            Compositor::Outline(c) => c.composite(sample),
            Compositor::Tint(c) => c.composite(sample),
        }
    }
}

pub(crate) fn decode_params<T: serde::de::DeserializeOwned>(
    params: &Value,
) -> Result<T, CompositeError> {
    // `null` means "no overrides", same as `{}`.
    let params = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params.clone()
    };
    serde_json::from_value(params).map_err(|e| CompositeError::InvalidParams(e.to_string()))
}

//! Error types for the isoline core.

use thiserror::Error;

/// Errors produced while configuring compositors or building fields.
///
/// Per-pixel evaluation never fails; every variant here is raised at
/// configuration or boundary time.
#[derive(Debug, Error)]
pub enum CompositeError {
    /// Width or height was zero when creating a Field or pixel grid.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A data buffer did not match the declared dimensions.
    #[error("dimension mismatch: expected {expected} values for ({width}, {height}), got {got}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },

    /// The cubic pulse half-width must be finite and strictly positive.
    #[error("invalid pulse half-width {0}: must be finite and > 0")]
    InvalidPulseWidth(f64),

    /// The fill band edges must be finite with `lo < hi`.
    #[error("invalid fill band [{lo}, {hi}]: lower edge must be below upper edge")]
    InvalidFillBand { lo: f64, hi: f64 },

    /// A scalar configuration channel was outside [0, 1] or not finite.
    #[error("invalid value for '{name}': {value} is outside [0, 1]")]
    InvalidChannel { name: String, value: f64 },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A JSON parameter object could not be decoded into a configuration.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The requested material name is not registered.
    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    /// The requested field shape name is not registered.
    #[error("unknown shape: {0}")]
    UnknownShape(String),

    /// An I/O failure while writing output.
    #[error("i/o error: {0}")]
    Io(String),
}

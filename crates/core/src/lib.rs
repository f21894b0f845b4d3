#![deny(unsafe_code)]
//! Core types for isoline: turning a scalar field sample into a color.
//!
//! Provides the shaping functions (`smoothstep`, `cubic_pulse`), the
//! `Compositor` materials (outline and tint) with their serde configs, the
//! `Rgba` color type, the `Field`/`FieldSampler` sampling boundary, analytic
//! `Shape` fields, and the GLSL sources for the same materials.

pub mod color;
pub mod compositor;
pub mod error;
pub mod field;
pub mod glsl;
pub mod shape;
pub mod shaping;

#[cfg(feature = "render")]
pub mod render;

pub use color::Rgba;
pub use compositor::{
    Composite, Compositor, OutlineCompositor, OutlineConfig, OutlineSample, TintCompositor,
    TintConfig,
};
pub use error::CompositeError;
pub use field::{texel_center, Field, FieldSampler, Filter};
pub use shape::Shape;
pub use shaping::{cubic_pulse, smoothstep, CubicPulse};

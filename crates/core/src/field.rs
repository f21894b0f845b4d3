//! Two-dimensional scalar field and the sampling boundary.
//!
//! A `Field` stores `width * height` f64 values in the range [0, 1] using
//! row-major layout, row 0 at the top. It behaves like a single-channel
//! texture: [`FieldSampler::sample`] takes normalized `(u, v)` coordinates,
//! uses clamp-to-edge addressing and either nearest or bilinear filtering.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::CompositeError;

/// The black-box scalar lookup every compositor consumes.
///
/// Given normalized coordinates `(u, v)`, returns a sample in [0, 1].
/// Implementations must be deterministic and free of shared mutable state so
/// the pixel grid can be evaluated in any order on any thread.
pub trait FieldSampler: Send + Sync {
    fn sample(&self, u: f64, v: f64) -> f64;
}

/// Texel filtering used by [`Field`] when sampled at normalized coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Returns the texel containing the coordinate.
    Nearest,
    /// Bilinear interpolation between the four nearest texel centers.
    #[default]
    Linear,
}

/// A 2D scalar field with values clamped to [0, 1] and clamp-to-edge addressing.
#[derive(Debug, Clone)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
    filter: Filter,
}

impl Field {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `CompositeError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, CompositeError> {
        Self::filled(width, height, 0.0)
    }

    /// Creates a field filled with `value`, clamped to [0, 1].
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self, CompositeError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![clamp_unit(value); len],
            filter: Filter::default(),
        })
    }

    /// Creates a field from a row-major data vector, clamping every value
    /// to [0, 1].
    ///
    /// Returns `CompositeError::DimensionMismatch` if
    /// `data.len() != width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, CompositeError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(CompositeError::DimensionMismatch {
                width,
                height,
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data: data.into_iter().map(clamp_unit).collect(),
            filter: Filter::default(),
        })
    }

    /// Creates a field from 8-bit single-channel texels (`byte / 255`).
    pub fn from_luma8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, CompositeError> {
        Self::from_data(
            width,
            height,
            bytes.iter().map(|&b| b as f64 / 255.0).collect(),
        )
    }

    /// Returns the field with the given sampling filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Field width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in texels.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Converts signed coordinates to a flat index, clamping to the edges.
    fn index(&self, x: isize, y: isize) -> usize {
        let xi = x.clamp(0, self.width as isize - 1) as usize;
        let yi = y.clamp(0, self.height as isize - 1) as usize;
        yi * self.width + xi
    }

    /// Gets the texel at `(x, y)`; out-of-range coordinates read the nearest edge.
    pub fn get(&self, x: isize, y: isize) -> f64 {
        self.data[self.index(x, y)]
    }

    /// Sets the texel at `(x, y)`, clamping coordinates to the edges and the
    /// value to [0, 1].
    pub fn set(&mut self, x: isize, y: isize, value: f64) {
        let idx = self.index(x, y);
        self.data[idx] = clamp_unit(value);
    }

    /// Iterates over all texels yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, v)
        })
    }

    fn sample_nearest(&self, u: f64, v: f64) -> f64 {
        let x = (u * self.width as f64).floor() as isize;
        let y = (v * self.height as f64).floor() as isize;
        self.get(x, y)
    }

    fn sample_linear(&self, u: f64, v: f64) -> f64 {
        // Texel centers sit at (i + 0.5) / size. Clamping one texel past each
        // edge keeps `x0 + 1` in range for huge or infinite coordinates.
        let fx = (u * self.width as f64 - 0.5).clamp(-1.0, self.width as f64);
        let fy = (v * self.height as f64 - 0.5).clamp(-1.0, self.height as f64);
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = self.get(x0, y0) * (1.0 - tx) + self.get(x0 + 1, y0) * tx;
        let bottom = self.get(x0, y0 + 1) * (1.0 - tx) + self.get(x0 + 1, y0 + 1) * tx;
        clamp_unit(top * (1.0 - ty) + bottom * ty)
    }
}

impl FieldSampler for Field {
    fn sample(&self, u: f64, v: f64) -> f64 {
        // NaN coordinates read the top-left texel.
        let u = if u.is_nan() { 0.0 } else { u };
        let v = if v.is_nan() { 0.0 } else { v };
        match self.filter {
            Filter::Nearest => self.sample_nearest(u, v),
            Filter::Linear => self.sample_linear(u, v),
        }
    }
}

/// Normalized coordinates of the center of texel `(x, y)` in a
/// `width x height` grid: `((x + 0.5) / width, (y + 0.5) / height)`.
pub fn texel_center(x: usize, y: usize, width: usize, height: usize) -> DVec2 {
    DVec2::new(
        (x as f64 + 0.5) / width as f64,
        (y as f64 + 0.5) / height as f64,
    )
}

fn checked_len(width: usize, height: usize) -> Result<usize, CompositeError> {
    if width == 0 || height == 0 {
        return Err(CompositeError::InvalidDimensions);
    }
    let len = width
        .checked_mul(height)
        .ok_or(CompositeError::InvalidDimensions)?;
    // Signed addressing must be able to represent every coordinate.
    if len > isize::MAX as usize {
        return Err(CompositeError::InvalidDimensions);
    }
    Ok(len)
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -- Constructors --

    #[test]
    fn new_creates_zero_filled_field() {
        let field = Field::new(4, 3).unwrap();
        assert_eq!(field.width(), 4);
        assert_eq!(field.height(), 3);
        assert_eq!(field.data().len(), 12);
        assert!(field.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn new_with_zero_dimension_returns_error() {
        assert!(matches!(
            Field::new(0, 5),
            Err(CompositeError::InvalidDimensions)
        ));
        assert!(matches!(
            Field::new(5, 0),
            Err(CompositeError::InvalidDimensions)
        ));
    }

    #[test]
    fn new_with_overflow_dimensions_returns_error() {
        assert!(Field::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn filled_clamps_value() {
        let high = Field::filled(2, 2, 1.5).unwrap();
        assert!(high.data().iter().all(|&v| v == 1.0));
        let low = Field::filled(2, 2, -0.3).unwrap();
        assert!(low.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn from_data_clamps_values() {
        let field = Field::from_data(2, 2, vec![-1.0, 0.25, 2.0, f64::NAN]).unwrap();
        assert_eq!(field.data(), &[0.0, 0.25, 1.0, 0.0]);
    }

    #[test]
    fn from_data_rejects_wrong_length() {
        let result = Field::from_data(2, 2, vec![0.1, 0.2, 0.3]);
        assert!(matches!(
            result,
            Err(CompositeError::DimensionMismatch {
                expected: 4,
                got: 3,
                ..
            })
        ));
    }

    #[test]
    fn from_luma8_normalizes_bytes() {
        let field = Field::from_luma8(3, 1, &[0, 51, 255]).unwrap();
        assert_eq!(field.get(0, 0), 0.0);
        assert!(approx_eq(field.get(1, 0), 0.2));
        assert_eq!(field.get(2, 0), 1.0);
    }

    // -- get/set --

    #[test]
    fn get_and_set_round_trip() {
        let mut field = Field::new(4, 4).unwrap();
        field.set(2, 3, 0.42);
        assert_eq!(field.get(2, 3), 0.42);
    }

    #[test]
    fn get_clamps_out_of_range_coordinates_to_edges() {
        let mut field = Field::new(3, 3).unwrap();
        field.set(0, 0, 0.1);
        field.set(2, 2, 0.9);
        assert_eq!(field.get(-5, -1), 0.1);
        assert_eq!(field.get(10, 7), 0.9);
    }

    #[test]
    fn set_clamps_value() {
        let mut field = Field::new(2, 2).unwrap();
        field.set(0, 0, 2.5);
        field.set(1, 0, -0.5);
        assert_eq!(field.get(0, 0), 1.0);
        assert_eq!(field.get(1, 0), 0.0);
    }

    #[test]
    fn iter_yields_row_major_triples() {
        let field = Field::from_data(2, 2, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let triples: Vec<_> = field.iter().collect();
        assert_eq!(
            triples,
            vec![(0, 0, 0.1), (1, 0, 0.2), (0, 1, 0.3), (1, 1, 0.4)]
        );
    }

    // -- Sampling --

    #[test]
    fn default_filter_is_linear() {
        assert_eq!(Field::new(1, 1).unwrap().filter(), Filter::Linear);
    }

    #[test]
    fn nearest_sampling_picks_containing_texel() {
        let field = Field::from_data(2, 1, vec![0.2, 0.8])
            .unwrap()
            .with_filter(Filter::Nearest);
        assert_eq!(field.sample(0.1, 0.5), 0.2);
        assert_eq!(field.sample(0.49, 0.5), 0.2);
        assert_eq!(field.sample(0.51, 0.5), 0.8);
        assert_eq!(field.sample(1.0, 0.5), 0.8);
    }

    #[test]
    fn linear_sampling_hits_texel_centers_exactly() {
        let field = Field::from_data(2, 1, vec![0.2, 0.8]).unwrap();
        assert!(approx_eq(field.sample(0.25, 0.5), 0.2));
        assert!(approx_eq(field.sample(0.75, 0.5), 0.8));
    }

    #[test]
    fn linear_sampling_interpolates_between_centers() {
        let field = Field::from_data(2, 1, vec![0.2, 0.8]).unwrap();
        assert!(approx_eq(field.sample(0.5, 0.5), 0.5));
    }

    #[test]
    fn linear_sampling_clamps_to_edge_outside_unit_square() {
        let field = Field::from_data(2, 1, vec![0.2, 0.8]).unwrap();
        assert!(approx_eq(field.sample(-3.0, 0.5), 0.2));
        assert!(approx_eq(field.sample(4.0, 9.0), 0.8));
    }

    #[test]
    fn nan_coordinates_do_not_panic() {
        let field = Field::filled(4, 4, 0.3).unwrap();
        assert!(approx_eq(field.sample(f64::NAN, f64::NAN), 0.3));
    }

    #[test]
    fn huge_coordinates_clamp_to_edge() {
        let field = Field::from_data(2, 1, vec![0.2, 0.8]).unwrap();
        assert!(approx_eq(field.sample(1e300, 0.5), 0.8));
        assert!(approx_eq(field.sample(f64::INFINITY, 0.5), 0.8));
        assert!(approx_eq(field.sample(-1e300, 0.5), 0.2));
        assert!(approx_eq(field.sample(f64::NEG_INFINITY, f64::INFINITY), 0.2));

        let nearest = field.with_filter(Filter::Nearest);
        assert_eq!(nearest.sample(1e300, 0.5), 0.8);
        assert_eq!(nearest.sample(f64::NEG_INFINITY, 0.5), 0.2);
    }

    #[test]
    fn texel_center_maps_to_cell_middle() {
        let uv = texel_center(0, 0, 4, 2);
        assert_eq!(uv, DVec2::new(0.125, 0.25));
        let uv = texel_center(3, 1, 4, 2);
        assert_eq!(uv, DVec2::new(0.875, 0.75));
    }

    #[test]
    fn field_is_usable_as_dyn_sampler() {
        let field = Field::filled(2, 2, 0.6).unwrap();
        let sampler: &dyn FieldSampler = &field;
        assert!(approx_eq(sampler.sample(0.5, 0.5), 0.6));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn samples_stay_in_unit_range(
                data in prop::collection::vec(-1.0_f64..2.0, 16),
                u in -2.0_f64..3.0,
                v in -2.0_f64..3.0,
                linear in any::<bool>(),
            ) {
                let filter = if linear { Filter::Linear } else { Filter::Nearest };
                let field = Field::from_data(4, 4, data).unwrap().with_filter(filter);
                let s = field.sample(u, v);
                prop_assert!((0.0..=1.0).contains(&s), "sample {s} out of range");
            }

            #[test]
            fn uniform_field_samples_uniformly(
                value in 0.0_f64..=1.0,
                u in 0.0_f64..=1.0,
                v in 0.0_f64..=1.0,
            ) {
                let field = Field::filled(5, 3, value).unwrap();
                prop_assert!((field.sample(u, v) - value).abs() < 1e-12);
            }
        }
    }
}

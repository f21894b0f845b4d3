#![deny(unsafe_code)]
//! Pixel-grid driver: evaluates a compositor once per output pixel.
//!
//! Every pixel is independent, so rows are composited in parallel with
//! rayon. The only inputs are a [`FieldSampler`] and a [`Composite`]
//! implementation, both shared immutably across threads.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use glam::DVec2;
use isoline_core::field::texel_center;
use isoline_core::{Composite, CompositeError, Field, FieldSampler, Rgba};
use rayon::prelude::*;

/// Normalized sample coordinates for output pixel `(x, y)`.
///
/// Pixels sample at their centers; row 0 is the top of the image.
pub fn pixel_uv(x: usize, y: usize, width: usize, height: usize) -> DVec2 {
    texel_center(x, y, width, height)
}

/// Composites a `width x height` image by sampling `sampler` at each pixel
/// center and passing the sample through `compositor`.
///
/// Output is row-major, row 0 first. Returns
/// `CompositeError::InvalidDimensions` if either dimension is zero or the
/// pixel count overflows.
pub fn composite_grid<S, C>(
    width: usize,
    height: usize,
    sampler: &S,
    compositor: &C,
) -> Result<Vec<Rgba>, CompositeError>
where
    S: FieldSampler + ?Sized,
    C: Composite + Sync + ?Sized,
{
    if width == 0 || height == 0 {
        return Err(CompositeError::InvalidDimensions);
    }
    let len = width
        .checked_mul(height)
        .ok_or(CompositeError::InvalidDimensions)?;
    log::debug!("compositing {width}x{height} grid");

    let mut pixels = vec![Rgba::BLACK; len];
    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                let uv = pixel_uv(x, y, width, height);
                *px = compositor.composite(sampler.sample(uv.x, uv.y));
            }
        });
    Ok(pixels)
}

/// Composites every texel of `field` directly, without resampling.
///
/// Output has the field's dimensions and layout.
pub fn composite_field<C>(field: &Field, compositor: &C) -> Vec<Rgba>
where
    C: Composite + Sync + ?Sized,
{
    field
        .data()
        .par_iter()
        .map(|&d| compositor.composite(d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoline_core::{Compositor, OutlineCompositor, Shape, TintCompositor};
    use serde_json::json;

    struct Constant(f64);

    impl FieldSampler for Constant {
        fn sample(&self, _u: f64, _v: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn pixel_uv_samples_pixel_centers() {
        assert_eq!(pixel_uv(0, 0, 2, 2), DVec2::new(0.25, 0.25));
        assert_eq!(pixel_uv(1, 1, 2, 2), DVec2::new(0.75, 0.75));
    }

    #[test]
    fn composite_grid_has_one_color_per_pixel() {
        let pixels =
            composite_grid(7, 3, &Constant(0.5), &OutlineCompositor::default()).unwrap();
        assert_eq!(pixels.len(), 21);
    }

    #[test]
    fn composite_grid_rejects_zero_dimensions() {
        let compositor = Compositor::default();
        assert!(matches!(
            composite_grid(0, 4, &Constant(0.5), &compositor),
            Err(CompositeError::InvalidDimensions)
        ));
        assert!(matches!(
            composite_grid(4, 0, &Constant(0.5), &compositor),
            Err(CompositeError::InvalidDimensions)
        ));
    }

    #[test]
    fn constant_field_gives_uniform_image() {
        let compositor = Compositor::default();
        let pixels = composite_grid(5, 5, &Constant(0.45), &compositor).unwrap();
        let expected = compositor.composite(0.45);
        assert!(pixels.iter().all(|&p| p == expected));
    }

    #[test]
    fn gradient_shape_fills_right_half_with_outline_in_the_middle() {
        let shape = Shape::from_name("gradient", &json!({})).unwrap();
        let pixels = composite_grid(10, 1, &shape, &OutlineCompositor::default()).unwrap();
        // u = 0.05: below the fill band, no outline.
        assert_eq!(pixels[0], Rgba::BLACK);
        // u = 0.95: above the fill band, no outline.
        assert_eq!(pixels[9], Rgba::WHITE);
        // u = 0.45 and 0.55 straddle the isoline and pick up the accent.
        assert!(pixels[4].r > pixels[4].g);
        assert!(pixels[5].r > pixels[5].g);
    }

    #[test]
    fn composite_grid_matches_sequential_evaluation() {
        let shape = Shape::from_name("noise", &json!({"seed": 3})).unwrap();
        let compositor = Compositor::default();
        let (w, h) = (17, 9);
        let parallel = composite_grid(w, h, &shape, &compositor).unwrap();

        let mut sequential = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let uv = pixel_uv(x, y, w, h);
                sequential.push(compositor.composite(shape.sample(uv.x, uv.y)));
            }
        }
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn composite_grid_is_deterministic() {
        let shape = Shape::from_name("disc", &json!({})).unwrap();
        let compositor = Compositor::Tint(TintCompositor::default());
        let a = composite_grid(32, 32, &shape, &compositor).unwrap();
        let b = composite_grid(32, 32, &shape, &compositor).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn composite_grid_accepts_trait_objects() {
        let sampler: &dyn FieldSampler = &Constant(1.0);
        let compositor: &(dyn Composite + Sync) = &TintCompositor::default();
        let pixels = composite_grid(2, 2, sampler, compositor).unwrap();
        assert_eq!(pixels[0], Rgba::new(1.0, 1.0, 0.5, 1.0));
    }

    #[test]
    fn composite_field_keeps_texel_order() {
        let field = Field::from_data(3, 1, vec![0.0, 0.5, 1.0]).unwrap();
        let pixels = composite_field(&field, &TintCompositor::default());
        assert_eq!(
            pixels,
            vec![
                Rgba::new(0.0, 0.0, 0.5, 1.0),
                Rgba::new(0.5, 0.5, 0.5, 1.0),
                Rgba::new(1.0, 1.0, 0.5, 1.0),
            ]
        );
    }

    #[test]
    fn composite_field_of_rasterized_shape_matches_grid() {
        let shape = Shape::from_name("gradient", &json!({})).unwrap();
        let field = shape.rasterize(8, 4).unwrap();
        let compositor = Compositor::default();
        let from_field = composite_field(&field, &compositor);
        let from_grid = composite_grid(8, 4, &shape, &compositor).unwrap();
        assert_eq!(from_field, from_grid);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_pixel_stays_in_range(
                width in 1_usize..24,
                height in 1_usize..24,
                seed in any::<u32>(),
            ) {
                let shape = Shape::from_name("noise", &json!({"seed": seed})).unwrap();
                let pixels = composite_grid(width, height, &shape, &Compositor::default()).unwrap();
                prop_assert_eq!(pixels.len(), width * height);
                prop_assert!(pixels.iter().all(|p| p.is_in_range()));
            }
        }
    }
}

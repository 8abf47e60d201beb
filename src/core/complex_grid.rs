use num::complex::Complex64;

use crate::core::{
    errors::{NewtonFractalError, Result},
    image_utils::LinearPixelMap,
};

/**
 * Uniformly sampled, axis-aligned square region of the complex plane.
 *
 * Points are stored row-major: `points[j * width + i] = re[i] + im[j] * i`, where
 * both `re` and `im` are ascending and include the end points `-bound` and `bound`.
 * Row zero is therefore the bottom of the region.
 *
 * Only `build_grid` and `Grid::from_points` construct a grid, so
 * `points.len() == width * height` always holds.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    points: Vec<Complex64>,
}

/// Samples `[-bound, bound] x [-bound, bound]i` with `width` columns and `height` rows.
pub fn build_grid(width: usize, height: usize, bound: f64) -> Result<Grid> {
    validate_resolution(width, height)?;
    if !bound.is_finite() || bound <= 0.0 {
        return Err(NewtonFractalError::InvalidBound(bound));
    }

    let real_axis = LinearPixelMap::new(width as u32, -bound, bound);
    let imag_axis = LinearPixelMap::new(height as u32, -bound, bound);

    let mut points = Vec::with_capacity(width * height);
    for j in 0..height {
        let im = imag_axis.map(j as u32);
        for i in 0..width {
            points.push(Complex64::new(real_axis.map(i as u32), im));
        }
    }

    Ok(Grid {
        width,
        height,
        points,
    })
}

fn validate_resolution(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || width > u32::MAX as usize || height > u32::MAX as usize {
        return Err(NewtonFractalError::InvalidResolution { width, height });
    }
    Ok(())
}

impl Grid {
    /// Wraps caller-provided samples, laid out the same way as `build_grid`.
    pub fn from_points(width: usize, height: usize, points: Vec<Complex64>) -> Result<Grid> {
        validate_resolution(width, height)?;
        if points.len() != width * height {
            return Err(NewtonFractalError::PointCountMismatch {
                expected: width * height,
                actual: points.len(),
            });
        }
        Ok(Grid {
            width,
            height,
            points,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn points(&self) -> &[Complex64] {
        &self.points
    }

    pub fn point(&self, i: usize, j: usize) -> Complex64 {
        self.points[j * self.width + i]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

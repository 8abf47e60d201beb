// Core of the Newton's method fractal: iterate Newton-Raphson from every
// sample point and record which root it lands on, and how quickly.

use std::io::{self, Write};

use num::complex::Complex64;
use rayon::iter::{
    IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator,
};
use serde::{Deserialize, Serialize};

use crate::core::{
    complex_grid::Grid,
    errors::{NewtonFractalError, Result},
};

/// Derivatives smaller than this (in magnitude) are replaced by this value.
pub const MIN_SLOPE_NORM: f64 = 1e-10;

/// Marks a point that has not (yet) come within tolerance of any root.
pub const UNCONVERGED: u8 = u8::MAX;

/// The non-convergent class index must fit below `UNCONVERGED`.
pub const MAX_ROOT_COUNT: usize = (u8::MAX - 1) as usize;

/// A complex-valued function with its derivative (slope).
pub trait ComplexFunctionWithSlope {
    /// f(z)
    fn value(&self, z: Complex64) -> Complex64;

    /// f'(z)
    fn slope(&self, z: Complex64) -> Complex64;
}

/// Ordered list of the known roots of a function. The position of a root in
/// this list is its class index; ties are broken in favor of the earlier root.
#[derive(Debug, Clone, PartialEq)]
pub struct RootSet {
    pub roots: Vec<Complex64>,
}

impl RootSet {
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Class index reserved for points that never reach a root.
    pub fn non_convergent_class(&self) -> u8 {
        self.roots.len() as u8
    }

    /// Index of the first root strictly within `tolerance` of `z`.
    /// Non-finite `z` never matches.
    #[inline]
    pub fn index_of_root_near(&self, z: Complex64, tolerance: f64) -> Option<usize> {
        self.roots.iter().position(|root| (z - root).norm() < tolerance)
    }

    fn validate(&self) -> Result<()> {
        if self.roots.len() > MAX_ROOT_COUNT {
            return Err(NewtonFractalError::TooManyRoots {
                max: MAX_ROOT_COUNT,
                actual: self.roots.len(),
            });
        }
        Ok(())
    }
}

/// f(z) = z^3 - 1, whose roots are the three cube roots of unity.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicRootsOfUnity;

impl CubicRootsOfUnity {
    /// 1, e^(2πi/3), e^(4πi/3). The complex pair is written out so that the
    /// two are exact conjugates of each other.
    pub fn roots(&self) -> RootSet {
        let half_sqrt_three = 0.5 * 3f64.sqrt();
        RootSet {
            roots: vec![
                Complex64::new(1.0, 0.0),
                Complex64::new(-0.5, half_sqrt_three),
                Complex64::new(-0.5, -half_sqrt_three),
            ],
        }
    }
}

impl ComplexFunctionWithSlope for CubicRootsOfUnity {
    #[inline]
    fn value(&self, z: Complex64) -> Complex64 {
        z * z * z - 1.0
    }

    #[inline]
    fn slope(&self, z: Complex64) -> Complex64 {
        3.0 * z * z
    }
}

/// Perform one Newton–Raphson step:  y = z - f(z) / f'(z)
/// A vanishing slope is clamped to `MIN_SLOPE_NORM` (as a real number), which
/// throws the iterate far away rather than dividing by zero. The quotient uses
/// `fdiv`, which stays finite where `|f'(z)|^2` alone would overflow.
#[inline]
pub fn guarded_newton_raphson_step<F>(z: Complex64, function: &F) -> Complex64
where
    F: ComplexFunctionWithSlope,
{
    let mut slope = function.slope(z);
    if slope.norm() < MIN_SLOPE_NORM {
        slope = Complex64::new(MIN_SLOPE_NORM, 0.0);
    }
    z - function.value(z).fdiv(slope)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ConvergenceParams {
    pub max_iter_count: u32,
    pub tolerance: f64,
}

impl Default for ConvergenceParams {
    fn default() -> Self {
        ConvergenceParams {
            max_iter_count: 80,
            tolerance: 1e-3,
        }
    }
}

impl ConvergenceParams {
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(NewtonFractalError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointClassification {
    pub class_index: u8,
    pub iteration_count: u32,
}

/// Iterates from `z0` until the iterate lands within tolerance of a root.
/// @return: (root index, iteration at which it converged), or None if it never did.
#[inline]
fn find_convergence<F>(
    z0: Complex64,
    function: &F,
    roots: &RootSet,
    params: &ConvergenceParams,
) -> Option<(u8, u32)>
where
    F: ComplexFunctionWithSlope,
{
    let mut z = z0;
    for iteration in 0..params.max_iter_count {
        z = guarded_newton_raphson_step(z, function);
        if let Some(index) = roots.index_of_root_near(z, params.tolerance) {
            return Some((index as u8, iteration));
        }
        // Once the iterate is NaN or infinite it can never come back.
        if !(z.re.is_finite() && z.im.is_finite()) {
            return None;
        }
    }
    None
}

/// Classifies a single starting point. Points that do not converge within
/// `max_iter_count` steps get the non-convergent class and `max_iter_count`.
pub fn classify_point<F>(
    z0: Complex64,
    function: &F,
    roots: &RootSet,
    params: &ConvergenceParams,
) -> PointClassification
where
    F: ComplexFunctionWithSlope,
{
    match find_convergence(z0, function, roots, params) {
        Some((class_index, iteration_count)) => PointClassification {
            class_index,
            iteration_count,
        },
        None => PointClassification {
            class_index: roots.non_convergent_class(),
            iteration_count: params.max_iter_count,
        },
    }
}

/// Per-point convergence data, laid out exactly like the `Grid` it was computed from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassificationField {
    pub width: usize,
    pub height: usize,
    pub non_convergent_class: u8,
    pub class_index: Vec<u8>,
    pub iteration_count: Vec<u32>,
}

impl ClassificationField {
    fn new_unresolved(grid: &Grid, roots: &RootSet, max_iter_count: u32) -> Self {
        ClassificationField {
            width: grid.width(),
            height: grid.height(),
            non_convergent_class: roots.non_convergent_class(),
            class_index: vec![UNCONVERGED; grid.len()],
            iteration_count: vec![max_iter_count; grid.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.class_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.class_index.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> PointClassification {
        let index = j * self.width + i;
        PointClassification {
            class_index: self.class_index[index],
            iteration_count: self.iteration_count[index],
        }
    }

    pub fn max_iteration_count(&self) -> u32 {
        self.iteration_count.par_iter().copied().max().unwrap_or(0)
    }

    /// Number of points in each class, indexed by class (the last entry is non-convergence).
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.non_convergent_class as usize + 1];
        for &class_index in self.class_index.iter() {
            counts[class_index as usize] += 1;
        }
        counts
    }

    pub fn statistics(&self) -> ConvergenceStatistics {
        let total: u64 = self.iteration_count.iter().map(|&n| n as u64).sum();
        ConvergenceStatistics {
            class_counts: self.class_counts(),
            max_iteration_count: self.max_iteration_count(),
            mean_iteration_count: if self.is_empty() {
                0.0
            } else {
                total as f64 / self.len() as f64
            },
        }
    }
}

/// Summary of a classification, written next to each render.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceStatistics {
    pub class_counts: Vec<usize>,
    pub max_iteration_count: u32,
    pub mean_iteration_count: f64,
}

impl ConvergenceStatistics {
    pub fn display<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "Convergence statistics:")?;
        let non_convergent = self.class_counts.len() - 1;
        for (class_index, count) in self.class_counts.iter().enumerate() {
            if class_index == non_convergent {
                writeln!(writer, "  non-convergent: {}", count)?;
            } else {
                writeln!(writer, "  root {}: {}", class_index, count)?;
            }
        }
        writeln!(writer, "  max iteration count: {}", self.max_iteration_count)?;
        writeln!(writer, "  mean iteration count: {:.3}", self.mean_iteration_count)
    }
}

/**
 * Runs Newton's method from every point of the grid, in parallel. Each worker owns
 * a disjoint set of entries in the output field, so no synchronization is needed.
 *
 * Points start out as `UNCONVERGED` with the iteration count at the cap; converged
 * points are written exactly once, and whatever is still unconverged at the end is
 * moved into the non-convergent class.
 */
pub fn classify<F>(
    grid: &Grid,
    function: &F,
    roots: &RootSet,
    params: &ConvergenceParams,
) -> Result<ClassificationField>
where
    F: ComplexFunctionWithSlope + Sync,
{
    params.validate()?;
    roots.validate()?;

    let mut field = ClassificationField::new_unresolved(grid, roots, params.max_iter_count);

    field
        .class_index
        .par_iter_mut()
        .zip(field.iteration_count.par_iter_mut())
        .zip(grid.points().par_iter())
        .for_each(|((class_index, iteration_count), &z0)| {
            if let Some((index, iteration)) = find_convergence(z0, function, roots, params) {
                *class_index = index;
                *iteration_count = iteration;
            }
        });

    let non_convergent_class = field.non_convergent_class;
    field
        .class_index
        .par_iter_mut()
        .filter(|class_index| **class_index == UNCONVERGED)
        .for_each(|class_index| *class_index = non_convergent_class);

    Ok(field)
}

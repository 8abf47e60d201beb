use image::RgbImage;
use nalgebra::Vector3;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::core::{
    errors::{NewtonFractalError, Result},
    image_utils::color_buffer_to_image,
};

use super::newtons_method_core::ClassificationField;

/// Base color for each convergence class. Components are on [0,1].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Palette {
    pub root_colors_rgb: Vec<[f32; 3]>,
    /// Used for points that never converge.
    pub background_color_rgb: [f32; 3],
}

impl Default for Palette {
    /// Gold, cyan, and magenta for the three roots, on a near-black background.
    fn default() -> Self {
        Palette {
            root_colors_rgb: vec![[1.0, 0.84, 0.0], [0.0, 0.9, 1.0], [1.0, 0.2, 0.6]],
            background_color_rgb: [0.05, 0.05, 0.08],
        }
    }
}

impl Palette {
    pub fn validate(&self, root_count: usize) -> Result<()> {
        if self.root_colors_rgb.len() != root_count {
            return Err(NewtonFractalError::PaletteSizeMismatch {
                expected: root_count,
                actual: self.root_colors_rgb.len(),
            });
        }
        let all_colors = self
            .root_colors_rgb
            .iter()
            .chain(std::iter::once(&self.background_color_rgb));
        for (index, rgb) in all_colors.enumerate() {
            if rgb.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(NewtonFractalError::PaletteComponentOutOfRange { index, rgb: *rgb });
            }
        }
        Ok(())
    }

    /// Base color for a class index. Anything past the last root is background.
    pub fn color(&self, class_index: u8) -> Vector3<f64> {
        let rgb = self
            .root_colors_rgb
            .get(class_index as usize)
            .unwrap_or(&self.background_color_rgb);
        Vector3::new(rgb[0] as f64, rgb[1] as f64, rgb[2] as f64)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShadingParams {
    /// Shapes the brightness falloff with iteration count.
    pub depth_exponent: f64,
    /// Applied to the final color; values below one darken the midtones.
    pub gamma: f64,
}

impl Default for ShadingParams {
    fn default() -> Self {
        ShadingParams {
            depth_exponent: 0.7,
            gamma: 0.9,
        }
    }
}

impl ShadingParams {
    pub fn validate(&self) -> Result<()> {
        let valid = |x: f64| x.is_finite() && x > 0.0;
        if !valid(self.depth_exponent) || !valid(self.gamma) {
            return Err(NewtonFractalError::InvalidShading {
                depth_exponent: self.depth_exponent,
                gamma: self.gamma,
            });
        }
        Ok(())
    }
}

/**
 * Brightness on [0,1] for a point that converged after `iteration_count` steps,
 * where `max_iteration_count` is the largest count anywhere in the image:
 *
 *   depth = (1 - ln(n + 1) / ln(m + 1)) ^ depth_exponent
 *
 * Fast convergence is bright, the slowest points are black. When `m == 0` every
 * point is at full brightness.
 */
pub fn depth_from_iteration_count(
    iteration_count: u32,
    max_iteration_count: u32,
    depth_exponent: f64,
) -> f64 {
    let normalized = if max_iteration_count == 0 {
        0.0
    } else {
        (iteration_count as f64 + 1.0).ln() / (max_iteration_count as f64 + 1.0).ln()
    };
    (1.0 - normalized).max(0.0).powf(depth_exponent)
}

/// RGB color for every point, laid out like the grid (row zero at the bottom).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ColorField {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[f32; 3]>,
}

impl ColorField {
    pub fn get(&self, i: usize, j: usize) -> [f32; 3] {
        self.pixels[j * self.width + i]
    }

    pub fn to_image(&self) -> RgbImage {
        color_buffer_to_image(self.width, self.height, &self.pixels)
    }
}

/**
 * Colors each point by its class, shaded by how quickly it converged.
 *
 * The global maximum iteration count is needed before any single point can be
 * shaded, so it is reduced first; the per-point work is then independent.
 */
pub fn colorize(
    classification: &ClassificationField,
    palette: &Palette,
    shading: &ShadingParams,
) -> Result<ColorField> {
    palette.validate(classification.non_convergent_class as usize)?;
    shading.validate()?;

    let max_iteration_count = classification.max_iteration_count();

    let pixels = classification
        .class_index
        .par_iter()
        .zip(classification.iteration_count.par_iter())
        .map(|(&class_index, &iteration_count)| {
            let depth = depth_from_iteration_count(
                iteration_count,
                max_iteration_count,
                shading.depth_exponent,
            );
            let shaded = palette.color(class_index) * depth;
            let channel = |c: f64| c.powf(shading.gamma).clamp(0.0, 1.0) as f32;
            [channel(shaded[0]), channel(shaded[1]), channel(shaded[2])]
        })
        .collect();

    Ok(ColorField {
        width: classification.width,
        height: classification.height,
        pixels,
    })
}

// Newton's method fractal for f(z) = z^3 - 1: parameters, the in-memory
// pipeline (grid -> classification -> colors), and rendering to disk.

use serde::{Deserialize, Serialize};

use crate::core::{
    complex_grid::build_grid,
    errors::Result,
    file_io::{serialize_to_json, FilePrefix},
    image_utils::write_image_to_file,
    stopwatch::Stopwatch,
};

use super::{
    depth_shading::{colorize, ColorField, Palette, ShadingParams},
    newtons_method_core::{classify, ClassificationField, ConvergenceParams, CubicRootsOfUnity},
};

/// Resolution of the sample grid and the half-width of the square it covers,
/// [-bound, bound] x [-bound, bound]i.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridSpecification {
    pub width: usize,
    pub height: usize,
    pub bound: f64,
}

impl Default for GridSpecification {
    // 4K UHD
    fn default() -> Self {
        GridSpecification {
            width: 3840,
            height: 2160,
            bound: 2.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NewtonsMethodParams {
    pub grid: GridSpecification,
    pub convergence: ConvergenceParams,
    pub palette: Palette,
    pub shading: ShadingParams,
    /// Also write the raw `ClassificationField` (bincode) next to the image.
    pub save_raw_data: bool,
}

/// Both products of the pipeline: the raw convergence data and the colors derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonFractal {
    pub classification: ClassificationField,
    pub colors: ColorField,
}

/// Validates every parameter up front, so that nothing is computed for a bad request.
fn validate(params: &NewtonsMethodParams, root_count: usize) -> Result<()> {
    params.convergence.validate()?;
    params.palette.validate(root_count)?;
    params.shading.validate()?;
    Ok(())
}

/**
 * Builds the grid, classifies every point by the root that Newton's method
 * converges to, and shades the result.
 */
pub fn generate(params: &NewtonsMethodParams) -> Result<NewtonFractal> {
    generate_with_stopwatch(params, &mut Stopwatch::new("generate".to_owned()))
}

/// Same as `generate`, recording a split for each stage.
pub fn generate_with_stopwatch(
    params: &NewtonsMethodParams,
    stopwatch: &mut Stopwatch,
) -> Result<NewtonFractal> {
    let function = CubicRootsOfUnity;
    let roots = function.roots();
    validate(params, roots.len())?;
    let grid = build_grid(params.grid.width, params.grid.height, params.grid.bound)?;
    stopwatch.record_split("setup".to_owned());

    let classification = classify(&grid, &function, &roots, &params.convergence)?;
    stopwatch.record_split("classify".to_owned());

    let colors = colorize(&classification, &params.palette, &params.shading)?;
    stopwatch.record_split("colorize".to_owned());

    Ok(NewtonFractal {
        classification,
        colors,
    })
}

/// Renders the fractal and writes the parameters, image, optional raw data, and
/// diagnostics, all sharing `file_prefix`. Nothing is written if the parameters
/// are rejected.
pub fn render_newtons_method(params: &NewtonsMethodParams, file_prefix: FilePrefix) -> Result<()> {
    let mut stopwatch = Stopwatch::new("Newton's Method Stopwatch".to_owned());

    log::info!(
        "Rendering f(z) = z^3 - 1 at {}x{}, {} iterations, region [{}, {}] + [{}, {}]i",
        params.grid.width,
        params.grid.height,
        params.convergence.max_iter_count,
        -params.grid.bound,
        params.grid.bound,
        -params.grid.bound,
        params.grid.bound,
    );

    let NewtonFractal {
        classification,
        colors,
    } = generate_with_stopwatch(params, &mut stopwatch)?;

    serialize_to_json(file_prefix.full_path_with_suffix(".json"), params)?;
    let imgbuf = colors.to_image();
    write_image_to_file(file_prefix.full_path_with_suffix(".png"), |f| imgbuf.save(f))?;
    stopwatch.record_split("write_png".to_owned());

    if params.save_raw_data {
        let path = file_prefix.full_path_with_suffix("_raw.bin");
        bincode::serialize_into(file_prefix.create_file_with_suffix("_raw.bin")?, &classification)?;
        log::info!("Wrote raw convergence data to: {}", path.display());
        stopwatch.record_split("write_raw_data".to_owned());
    }

    let statistics = classification.statistics();
    log::info!(
        "Class counts (roots..., non-convergent): {:?}",
        statistics.class_counts
    );

    let mut diagnostics = file_prefix.create_file_with_suffix("_diagnostics.txt")?;
    stopwatch.display(&mut diagnostics)?;
    statistics.display(&mut diagnostics)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::NewtonFractalError;

    fn small_params() -> NewtonsMethodParams {
        NewtonsMethodParams {
            grid: GridSpecification {
                width: 32,
                height: 18,
                bound: 2.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_params_match_reference_run() {
        let params = NewtonsMethodParams::default();
        assert_eq!(params.grid.width, 3840);
        assert_eq!(params.grid.height, 2160);
        assert_eq!(params.grid.bound, 2.0);
        assert_eq!(params.convergence.max_iter_count, 80);
        assert_eq!(params.convergence.tolerance, 1e-3);
        assert_eq!(params.palette.root_colors_rgb.len(), 3);
        assert!(!params.save_raw_data);
    }

    #[test]
    fn test_partial_params_fall_back_to_defaults() {
        let params: NewtonsMethodParams =
            serde_json::from_str(r#"{ "grid": { "width": 10, "height": 5, "bound": 1.0 } }"#)
                .unwrap();
        assert_eq!(params.grid.width, 10);
        assert_eq!(params.convergence, ConvergenceParams::default());
        assert_eq!(params.palette, Palette::default());
    }

    #[test]
    fn test_generate_sizes() {
        let fractal = generate(&small_params()).unwrap();
        assert_eq!(fractal.classification.len(), 32 * 18);
        assert_eq!(fractal.colors.pixels.len(), 32 * 18);
        assert_eq!(fractal.colors.width, 32);
        assert_eq!(fractal.colors.height, 18);
        assert!(fractal.classification.class_index.iter().all(|&c| c <= 3));
    }

    #[test]
    fn test_generate_rejects_bad_palette_before_computing() {
        let mut params = small_params();
        params.palette.root_colors_rgb.pop();
        assert!(matches!(
            generate(&params),
            Err(NewtonFractalError::PaletteSizeMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_generate_with_stopwatch_records_each_stage() {
        let mut stopwatch = Stopwatch::new("test".to_owned());
        let fractal = generate_with_stopwatch(&small_params(), &mut stopwatch).unwrap();
        assert_eq!(fractal, generate(&small_params()).unwrap());
        let names: Vec<&str> = stopwatch.splits.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["setup", "classify", "colorize"]);
    }

    #[test]
    fn test_render_writes_nothing_for_bad_params() {
        let mut params = small_params();
        params.convergence.tolerance = -1.0;
        let directory_path = std::path::PathBuf::from("out/test/rejected_render");
        std::fs::create_dir_all(&directory_path).unwrap();
        let file_prefix = FilePrefix {
            directory_path,
            file_base: "rejected".to_owned(),
        };
        let json_path = file_prefix.full_path_with_suffix(".json");
        let _ = std::fs::remove_file(&json_path);
        assert!(matches!(
            render_newtons_method(&params, file_prefix),
            Err(NewtonFractalError::InvalidTolerance(_))
        ));
        assert!(!json_path.exists());
    }

    #[test]
    fn test_generate_rejects_bad_grid() {
        let mut params = small_params();
        params.grid.height = 0;
        assert!(matches!(
            generate(&params),
            Err(NewtonFractalError::InvalidResolution { .. })
        ));
    }
}

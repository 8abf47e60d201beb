use crate::core::{errors::Result, file_io::FilePrefix};
use crate::fractals::{common::FractalParams, newtons_method::render_newtons_method};

pub fn read_fractal_params(params_path: &str) -> Result<FractalParams> {
    let text = std::fs::read_to_string(params_path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn render_fractal(params: &FractalParams, mut file_prefix: FilePrefix) -> Result<()> {
    match params {
        FractalParams::NewtonsMethod(inner_params) => {
            file_prefix.create_and_step_into_sub_directory("newtons_method")?;
            render_newtons_method(inner_params, file_prefix)
        }
    }
}

use clap::Parser;
use newton_fractal::{
    cli::{
        args::{CommandsEnum, NewtonFractalArgs},
        render::{read_fractal_params, render_fractal},
    },
    core::{
        errors::Result,
        file_io::{
            build_output_path_with_date_time, extract_base_name, maybe_date_time_string,
            FilePrefix,
        },
    },
    fractals::common::FractalParams,
};

fn run(args: &NewtonFractalArgs) -> Result<()> {
    match &args.command {
        Some(CommandsEnum::Render(params)) => {
            let file_prefix = FilePrefix {
                directory_path: build_output_path_with_date_time(
                    &params.params_path,
                    "render",
                    &maybe_date_time_string(params.date_time_out),
                )?,
                file_base: extract_base_name(&params.params_path).to_owned(),
            };
            render_fractal(&read_fractal_params(&params.params_path)?, file_prefix)
        }
        Some(CommandsEnum::DefaultParams) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&FractalParams::default())?
            );
            Ok(())
        }
        None => {
            log::warn!("Default command (nothing specified!)");
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = NewtonFractalArgs::parse();
    if let Err(error) = run(&args) {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

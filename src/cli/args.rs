use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct NewtonFractalArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Render the fractal described by a parameter file.
    Render(ParameterFilePath),
    /// Print a parameter file for the default (4K) render.
    DefaultParams,
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,

    /// Write into a sub-directory named after the current date and time.
    #[clap(long, short)]
    pub date_time_out: bool,
}

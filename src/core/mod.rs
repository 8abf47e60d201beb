pub mod complex_grid;
pub mod errors;
pub mod file_io;
pub mod image_utils;
pub mod stopwatch;

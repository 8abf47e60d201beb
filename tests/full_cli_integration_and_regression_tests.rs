use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use newton_fractal::cli::render::{read_fractal_params, render_fractal};
use newton_fractal::core::file_io::FilePrefix;

fn compute_file_hash(file_path: &Path) -> Result<String, io::Error> {
    let mut file = File::open(file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = Vec::new();

    file.read_to_end(&mut buffer)?;

    hasher.update(&buffer);

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

fn render_tiny_into(directory: &str) -> PathBuf {
    let directory_path: PathBuf = ["out", "test", directory].iter().collect();
    std::fs::create_dir_all(&directory_path).unwrap();
    let params = read_fractal_params("params/newton_cubic_tiny.json").unwrap();
    render_fractal(
        &params,
        FilePrefix {
            directory_path: directory_path.clone(),
            file_base: String::from("result"),
        },
    )
    .unwrap();
    directory_path.join("newtons_method")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiny_render_writes_all_outputs() {
        let output = render_tiny_into("render_outputs");
        for suffix in [".json", ".png", "_raw.bin", "_diagnostics.txt"] {
            let path = output.join(format!("result{}", suffix));
            assert!(path.exists(), "missing output file: {}", path.display());
        }

        let image = image::open(output.join("result.png")).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (64, 36));

        let diagnostics = std::fs::read_to_string(output.join("result_diagnostics.txt")).unwrap();
        assert!(diagnostics.contains("classify"));
        assert!(diagnostics.contains("non-convergent"));
    }

    #[test]
    fn test_tiny_render_is_reproducible() {
        let first = render_tiny_into("regression_a");
        let second = render_tiny_into("regression_b");
        for file_name in ["result.png", "result_raw.bin"] {
            assert_eq!(
                compute_file_hash(&first.join(file_name)).unwrap(),
                compute_file_hash(&second.join(file_name)).unwrap(),
                "{} differs between identical renders",
                file_name
            );
        }
    }

    #[test]
    fn test_raw_data_round_trip_matches_generate() {
        use newton_fractal::fractals::{
            common::FractalParams, newtons_method::generate,
            newtons_method_core::ClassificationField,
        };

        let output = render_tiny_into("raw_data");
        let file = File::open(output.join("result_raw.bin")).unwrap();
        let stored: ClassificationField = bincode::deserialize_from(file).unwrap();

        let FractalParams::NewtonsMethod(params) =
            read_fractal_params("params/newton_cubic_tiny.json").unwrap();
        assert_eq!(stored, generate(&params).unwrap().classification);
    }
}

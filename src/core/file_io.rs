use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::errors::Result;

pub fn extract_base_name(path: &str) -> &str {
    Path::new(path)
        .file_stem() // Get the base name component of the path
        .and_then(|name| name.to_str())
        .unwrap_or("fractal")
}

/// Builds (and creates) `out/<project>/<params base name>[/<date time>]`.
pub fn build_output_path_with_date_time(
    params_path: &str,
    project: &str,
    datetime: &Option<String>,
) -> Result<PathBuf> {
    let mut dirs = vec!["out", project, extract_base_name(params_path)];
    if let Some(inner_datetime_str) = datetime {
        dirs.push(inner_datetime_str);
    }

    let directory_path: PathBuf = dirs.iter().collect();
    std::fs::create_dir_all(&directory_path)?;
    Ok(directory_path)
}

pub fn date_time_string() -> String {
    use chrono::{Datelike, Local, Timelike};
    let local_time = Local::now();
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        local_time.year(),
        local_time.month(),
        local_time.day(),
        local_time.hour(),
        local_time.minute(),
        local_time.second()
    )
}

pub fn maybe_date_time_string(enable: bool) -> Option<String> {
    if enable {
        Some(date_time_string())
    } else {
        None
    }
}

/**
 * Store a path and prefix together, making it easily to quickly generate
 * a collection of files with the same prefix, but separate suffixes.
 */
#[derive(Clone, Debug)]
pub struct FilePrefix {
    pub directory_path: PathBuf,
    pub file_base: String,
}

impl FilePrefix {
    pub fn create_and_step_into_sub_directory(&mut self, sub_directory: &str) -> Result<()> {
        self.directory_path = self.directory_path.join(sub_directory);
        std::fs::create_dir_all(&self.directory_path)?;
        Ok(())
    }

    pub fn full_path_with_suffix(&self, suffix: &str) -> PathBuf {
        self.directory_path.join(self.file_base.clone() + suffix)
    }

    pub fn create_file_with_suffix(
        &self,
        suffix: &str,
    ) -> Result<std::io::BufWriter<std::fs::File>> {
        let file = std::fs::File::create(self.full_path_with_suffix(suffix))?;
        Ok(std::io::BufWriter::new(file))
    }
}

pub fn serialize_to_json<T: Serialize>(filename: PathBuf, data: &T) -> Result<()> {
    let file = std::fs::File::create(&filename)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), data)?;
    log::info!("Wrote parameter file to: {}", filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_base_name() {
        assert_eq!(extract_base_name("params/newton_cubic_4k.json"), "newton_cubic_4k");
        assert_eq!(extract_base_name("tiny.json"), "tiny");
    }

    #[test]
    fn test_file_prefix_suffix() {
        let prefix = FilePrefix {
            directory_path: PathBuf::from("out/render"),
            file_base: "tiny".to_owned(),
        };
        assert_eq!(
            prefix.full_path_with_suffix("_diagnostics.txt"),
            PathBuf::from("out/render/tiny_diagnostics.txt")
        );
    }

    #[test]
    fn test_date_time_string_format() {
        let text = date_time_string();
        assert_eq!(text.len(), 15);
        assert_eq!(&text[8..9], "_");
        assert!(maybe_date_time_string(false).is_none());
    }
}

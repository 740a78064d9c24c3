use crate::config::normalize_extension;
use crate::error::{BoxExportError, Result};
use crate::scanner::InputFile;
use std::fs;
use std::path::{Path, PathBuf};

/// Owns the destination directory of a batch and names the report written
/// for each input file.
pub struct OutputManager {
    output_directory: PathBuf,
    output_extension: String,
}

impl OutputManager {
    /// Creates the directory if needed and checks that it accepts new files.
    pub fn new(output_directory: PathBuf, output_extension: &str) -> Result<Self> {
        let manager = Self {
            output_directory,
            output_extension: normalize_extension(output_extension),
        };

        manager.validate_paths()?;
        Ok(manager)
    }

    pub fn get_output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn output_name(&self, input: &InputFile) -> String {
        input.output_name(&self.output_extension)
    }

    pub fn output_path(&self, input: &InputFile) -> PathBuf {
        self.output_directory.join(self.output_name(input))
    }

    fn validate_paths(&self) -> Result<()> {
        let dir_error = |reason: String| BoxExportError::OutputDirectory {
            path: self.output_directory.display().to_string(),
            reason,
        };

        if self.output_directory.exists() && !self.output_directory.is_dir() {
            return Err(dir_error("exists but is not a directory".to_string()));
        }

        fs::create_dir_all(&self.output_directory)
            .map_err(|e| dir_error(format!("cannot create directory: {}", e)))?;

        let test_file = self.output_directory.join(".boxexport_write_test");
        match fs::File::create(&test_file) {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                return Err(dir_error(format!("no write permission: {}", e)));
            }
        }

        Ok(())
    }
}

use crate::error::{BoxExportError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub report: ReportConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub extension: String,
    pub lock_file_prefix: String,
    pub exclude_patterns: Vec<String>,
    pub header_rows: u32,
    pub empty_case_number: EmptyCasePolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub fonds_label: String,
    pub fonds_value: String,
    pub category_label: String,
    pub category_value: String,
    pub box_label: String,
    pub output_extension: String,
    pub date_format: String,
    pub font_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    pub start_sequence: u64,
    pub output_directory: PathBuf,
}

/// What a row with an empty case number means for the rest of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyCasePolicy {
    /// Drop the row and keep scanning.
    #[default]
    Skip,
    /// Treat the row as the end of the data.
    Stop,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            report: ReportConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: "xls".to_string(),
            lock_file_prefix: "~$".to_string(),
            exclude_patterns: Vec::new(),
            header_rows: 2,
            empty_case_number: EmptyCasePolicy::Skip,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "卷内目录".to_string(),
            fonds_label: "全宗号".to_string(),
            fonds_value: "120".to_string(),
            category_label: "类目".to_string(),
            category_value: "BL".to_string(),
            box_label: "箱号".to_string(),
            output_extension: "xlsx".to_string(),
            date_format: "yyyy-mm-dd".to_string(),
            font_name: "宋体".to_string(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            start_sequence: 1,
            output_directory: PathBuf::from("output"),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BoxExportError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BoxExportError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| BoxExportError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["boxexport.toml", "boxexport.config.toml", ".boxexport.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref extension) = cli_args.extension {
            self.input.extension = normalize_extension(extension);
        }

        if let Some(ref exclude) = cli_args.exclude {
            self.input.exclude_patterns.extend(exclude.clone());
        }

        if let Some(start) = cli_args.start_sequence {
            self.batch.start_sequence = start;
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.batch.output_directory = output_dir.clone();
        }

        if let Some(policy) = cli_args.empty_case_number {
            self.input.empty_case_number = policy;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if normalize_extension(&self.input.extension).is_empty() {
            return Err(BoxExportError::Config {
                message: "An input file extension must be specified".to_string(),
            });
        }

        if normalize_extension(&self.report.output_extension).is_empty() {
            return Err(BoxExportError::Config {
                message: "An output file extension must be specified".to_string(),
            });
        }

        if self.batch.start_sequence == 0 {
            return Err(BoxExportError::InvalidStartSequence {
                value: self.batch.start_sequence,
            });
        }

        for pattern in &self.input.exclude_patterns {
            Regex::new(pattern)?;
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

/// Lower-cases an extension and drops a leading dot, so `.XLS` and `xls` agree.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub extension: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub start_sequence: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub empty_case_number: Option<EmptyCasePolicy>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_exclude(mut self, exclude: Option<Vec<String>>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_start_sequence(mut self, start: Option<u64>) -> Self {
        self.start_sequence = start;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_empty_case_number(mut self, policy: Option<EmptyCasePolicy>) -> Self {
        self.empty_case_number = policy;
        self
    }
}

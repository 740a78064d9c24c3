use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoxExportError {
    #[error("Cannot access source directory {path}: {reason}")]
    DirectoryAccess { path: String, reason: String },

    #[error("No input files found in {path}")]
    NoInputFiles { path: String, extension: String },

    #[error("Failed to parse {file}: {message}")]
    FileParse { file: String, message: String },

    #[error("Failed to write report {path}: {message}")]
    ReportWrite { path: String, message: String },

    #[error("Invalid start sequence: {value}")]
    InvalidStartSequence { value: u64 },

    #[error("Cannot prepare output directory {path}: {reason}")]
    OutputDirectory { path: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for BoxExportError {
    fn user_message(&self) -> String {
        match self {
            BoxExportError::DirectoryAccess { path, reason } => {
                format!("Source directory is not accessible: {} ({})", path, reason)
            }
            BoxExportError::NoInputFiles { path, extension } => {
                format!("No .{} files found in {}", extension, path)
            }
            BoxExportError::FileParse { file, message } => {
                format!("Could not read spreadsheet {}: {}", file, message)
            }
            BoxExportError::ReportWrite { path, message } => {
                format!("Could not write report {}: {}", path, message)
            }
            BoxExportError::InvalidStartSequence { value } => {
                format!("Start sequence must be a positive integer, got {}", value)
            }
            BoxExportError::OutputDirectory { path, reason } => {
                format!("Output directory {} is not usable: {}", path, reason)
            }
            BoxExportError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            BoxExportError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            BoxExportError::DirectoryAccess { .. } => Some(
                "Check that the path exists, is a directory, and that you have read permission."
                    .to_string(),
            ),
            BoxExportError::NoInputFiles { .. } => Some(
                "Point SOURCE_DIR at the folder holding the box files, or change the input extension with --extension.".to_string()
            ),
            BoxExportError::FileParse { .. } => Some(
                "Open the file in a spreadsheet program and re-save it; reports already written were kept.".to_string()
            ),
            BoxExportError::ReportWrite { .. } => Some(
                "Make sure the report is not open in another program and the output directory is writable.".to_string()
            ),
            BoxExportError::InvalidStartSequence { .. } => {
                Some("Pass a start sequence of 1 or more with --start.".to_string())
            }
            BoxExportError::OutputDirectory { .. } => Some(
                "Choose a different output directory with --output or fix its permissions."
                    .to_string(),
            ),
            BoxExportError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for BoxExportError {
    fn from(error: toml::de::Error) -> Self {
        BoxExportError::Config {
            message: error.to_string(),
        }
    }
}

impl From<regex::Error> for BoxExportError {
    fn from(error: regex::Error) -> Self {
        BoxExportError::Config {
            message: format!("Invalid exclude pattern: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, BoxExportError>;

use crate::config::{normalize_extension, InputConfig};
use crate::error::Result;
use regex::Regex;
use std::path::Path;

pub struct FileFilter {
    extension: String,
    lock_file_prefix: String,
    exclude_patterns: Vec<Regex>,
}

impl FileFilter {
    pub fn new(config: &InputConfig) -> Result<Self> {
        let exclude_patterns = config
            .exclude_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            extension: normalize_extension(&config.extension),
            lock_file_prefix: config.lock_file_prefix.clone(),
            exclude_patterns,
        })
    }

    pub fn is_input_file(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            return false;
        };

        if self.is_lock_file(file_name) {
            return false;
        }

        // A suffix match also accepts a file named just `.xls`.
        let matches_extension = file_name
            .to_lowercase()
            .ends_with(&format!(".{}", self.extension));
        if !matches_extension {
            return false;
        }

        !self.matches_any_pattern(file_name)
    }

    /// Office writes `~$name.xls` beside a workbook that is open for editing.
    pub fn is_lock_file(&self, file_name: &str) -> bool {
        !self.lock_file_prefix.is_empty() && file_name.starts_with(&self.lock_file_prefix)
    }

    pub fn matches_any_pattern(&self, text: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| pattern.is_match(text))
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

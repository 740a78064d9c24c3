use crate::config::InputConfig;
use crate::error::{BoxExportError, Result};
use crate::scanner::box_identifier::numeric_stem;
use crate::scanner::file_filter::FileFilter;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Primary ordering key of an input file. Numeric stems come first, in
/// numeric order; everything else follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Numeric(u64),
    NonNumeric,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub file_name: String,
    pub stem: String,
    pub sort_key: SortKey,
}

impl InputFile {
    pub fn new(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let sort_key = match numeric_stem(&stem) {
            Some(value) => SortKey::Numeric(value),
            None => SortKey::NonNumeric,
        };

        Self {
            path,
            file_name,
            stem,
            sort_key,
        }
    }

    pub fn output_name(&self, output_extension: &str) -> String {
        format!("{}.{}", self.stem, output_extension)
    }
}

impl Ord for InputFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key
            .cmp(&other.sort_key)
            .then_with(|| self.file_name.cmp(&other.file_name))
    }
}

impl PartialOrd for InputFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct SourceFileLocator {
    filter: FileFilter,
}

impl SourceFileLocator {
    pub fn new(config: &InputConfig) -> Result<Self> {
        Ok(Self {
            filter: FileFilter::new(config)?,
        })
    }

    /// Lists the eligible input files directly inside `root`, in processing
    /// order. Subdirectories are not descended into.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<InputFile>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            let reason = if root_path.exists() {
                "not a directory"
            } else {
                "does not exist"
            };
            return Err(BoxExportError::DirectoryAccess {
                path: root_path.display().to_string(),
                reason: reason.to_string(),
            });
        }

        let root_path =
            fs::canonicalize(root_path).map_err(|e| BoxExportError::DirectoryAccess {
                path: root_path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut files = Vec::new();

        let walker = WalkDir::new(&root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // The root itself could not be listed.
                Err(err) if err.depth() == 0 => {
                    return Err(BoxExportError::DirectoryAccess {
                        path: root_path.display().to_string(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    debug!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !self.filter.is_input_file(path) {
                continue;
            }

            files.push(InputFile::new(path.to_path_buf()));
        }

        if files.is_empty() {
            return Err(BoxExportError::NoInputFiles {
                path: root_path.display().to_string(),
                extension: self.filter.extension().to_string(),
            });
        }

        files.sort();
        debug!(count = files.len(), dir = %root_path.display(), "located input files");

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(files: &[InputFile]) -> Vec<&str> {
        files.iter().map(|f| f.file_name.as_str()).collect()
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_input_file_creation() {
        let file = InputFile::new(PathBuf::from("/data/000013.XLS"));

        assert_eq!(file.file_name, "000013.XLS");
        assert_eq!(file.stem, "000013");
        assert_eq!(file.sort_key, SortKey::Numeric(13));
        assert_eq!(file.output_name("xlsx"), "000013.xlsx");
    }

    #[test]
    fn test_bare_extension_file_sorts_last() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), ".xls");
        touch(temp_dir.path(), "000004.xls");

        let locator = SourceFileLocator::new(&InputConfig::default()).unwrap();
        let files = locator.scan_directory(temp_dir.path()).unwrap();

        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["000004.xls", ".xls"]);
        assert_eq!(files[1].sort_key, SortKey::NonNumeric);
        assert_eq!(files[1].output_name("xlsx"), ".xls.xlsx");
    }

    #[test]
    fn test_numeric_order_beats_lexical_order() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["abc.xls", "000100.xls", "000010.xls", "000002.xls", "000013.XLS"] {
            touch(temp_dir.path(), name);
        }

        let locator = SourceFileLocator::new(&InputConfig::default()).unwrap();
        let files = locator.scan_directory(temp_dir.path()).unwrap();

        assert_eq!(
            names(&files),
            vec!["000002.xls", "000010.xls", "000013.XLS", "000100.xls", "abc.xls"]
        );
    }

    #[test]
    fn test_ties_and_non_numeric_use_file_name() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["zeta.xls", "7.xls", "007.xls", "alpha.xls", "0.xls", "000.xls"] {
            touch(temp_dir.path(), name);
        }

        let locator = SourceFileLocator::new(&InputConfig::default()).unwrap();
        let files = locator.scan_directory(temp_dir.path()).unwrap();

        assert_eq!(
            names(&files),
            vec!["0.xls", "000.xls", "007.xls", "7.xls", "alpha.xls", "zeta.xls"]
        );
    }

    #[test]
    fn test_ineligible_entries_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "000001.xls");
        touch(temp_dir.path(), "~$000001.xls");
        touch(temp_dir.path(), "notes.txt");
        touch(temp_dir.path(), "000002.xlsx");
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        touch(&temp_dir.path().join("nested"), "000003.xls");

        let locator = SourceFileLocator::new(&InputConfig::default()).unwrap();
        let files = locator.scan_directory(temp_dir.path()).unwrap();

        assert_eq!(names(&files), vec!["000001.xls"]);
        assert!(files[0].path.is_absolute());
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let locator = SourceFileLocator::new(&InputConfig::default()).unwrap();

        let result = locator.scan_directory(temp_dir.path().join("missing"));
        assert!(matches!(result, Err(BoxExportError::DirectoryAccess { .. })));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "000001.xls");
        let locator = SourceFileLocator::new(&InputConfig::default()).unwrap();

        let result = locator.scan_directory(temp_dir.path().join("000001.xls"));
        assert!(matches!(result, Err(BoxExportError::DirectoryAccess { .. })));
    }

    #[test]
    fn test_no_input_files() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "readme.txt");
        let locator = SourceFileLocator::new(&InputConfig::default()).unwrap();

        let result = locator.scan_directory(temp_dir.path());
        match result {
            Err(BoxExportError::NoInputFiles { extension, .. }) => assert_eq!(extension, "xls"),
            other => panic!("expected NoInputFiles, got {:?}", other),
        }
    }
}

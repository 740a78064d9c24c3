pub mod box_identifier;
pub mod file_filter;
pub mod source_locator;

pub use box_identifier::{box_number, numeric_stem};
pub use file_filter::FileFilter;
pub use source_locator::{InputFile, SortKey, SourceFileLocator};

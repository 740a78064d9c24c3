pub mod output_manager;
pub mod record;
pub mod record_extractor;
pub mod report_builder;

pub use output_manager::OutputManager;
pub use record::{CellValue, Record};
pub use record_extractor::RecordExtractor;
pub use report_builder::{ReportBuilder, ReportLayout};

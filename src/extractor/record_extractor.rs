use crate::config::{EmptyCasePolicy, InputConfig};
use crate::error::{BoxExportError, Result};
use crate::extractor::record::{CellValue, Record};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::debug;

// Source column layout, 0-indexed. Column 0 (archive id) and 8 (notes) are
// not exported.
const CASE_NUMBER_COL: u32 = 2;
const DEPARTMENT_COL: u32 = 3;
const PATIENT_NAME_COL: u32 = 4;
const DISCHARGE_DATE_COL: u32 = 5;
const ADMISSION_DATE_COL: u32 = 6;
const IMAGE_COUNT_COL: u32 = 7;

pub struct RecordExtractor {
    header_rows: u32,
    empty_case_number: EmptyCasePolicy,
}

impl RecordExtractor {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            header_rows: config.header_rows,
            empty_case_number: config.empty_case_number,
        }
    }

    /// Reads the records of the first worksheet of `path`. The workbook is
    /// closed before this returns.
    pub fn read_records(&self, path: &Path) -> Result<Vec<Record>> {
        let parse_error = |message: String| BoxExportError::FileParse {
            file: path.display().to_string(),
            message,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| parse_error("workbook has no worksheets".to_string()))?
            .map_err(|e| parse_error(e.to_string()))?;

        let records = self.records_from_range(&range);
        debug!(file = %path.display(), records = records.len(), "read box index");

        Ok(records)
    }

    pub fn records_from_range(&self, range: &Range<Data>) -> Vec<Record> {
        let Some((last_row, _)) = range.end() else {
            return Vec::new();
        };

        let cell = |row: u32, col: u32| CellValue::from(range.get_value((row, col)));
        let mut records = Vec::new();

        for row in self.header_rows..=last_row {
            let case_number = cell(row, CASE_NUMBER_COL);
            if case_number.is_blank() {
                match self.empty_case_number {
                    EmptyCasePolicy::Skip => continue,
                    EmptyCasePolicy::Stop => break,
                }
            }

            records.push(Record {
                case_number,
                department: cell(row, DEPARTMENT_COL),
                patient_name: cell(row, PATIENT_NAME_COL),
                discharge_date: cell(row, DISCHARGE_DATE_COL),
                admission_date: cell(row, ADMISSION_DATE_COL),
                image_count: cell(row, IMAGE_COUNT_COL),
            });
        }

        records
    }
}

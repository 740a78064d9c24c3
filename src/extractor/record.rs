use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};

/// A spreadsheet cell carried through unchanged, except that date-tagged
/// cells are resolved to a calendar date/time.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Empty cells and empty strings both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            // An out-of-range serial keeps its raw number.
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => CellValue::DateTime(value),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => parse_iso_datetime(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(e.to_string()),
        }
    }
}

impl From<Option<&Data>> for CellValue {
    fn from(data: Option<&Data>) -> Self {
        data.map(CellValue::from).unwrap_or(CellValue::Empty)
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| {
            s.parse::<NaiveDate>()
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// One archived case entry read from a box index row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub case_number: CellValue,
    pub department: CellValue,
    pub patient_name: CellValue,
    pub discharge_date: CellValue,
    pub admission_date: CellValue,
    pub image_count: CellValue,
}

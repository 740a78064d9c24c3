use crate::config::ReportConfig;
use crate::error::{BoxExportError, Result};
use crate::extractor::record::{CellValue, Record};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::debug;

const HEADERS: [&str; 8] = [
    "顺序号",
    "病案号",
    "出院科室",
    "患者姓名",
    "出院时间",
    "入院时间",
    "成像张数",
    "备注",
];

const COLUMN_WIDTHS: [f64; 8] = [8.0, 11.0, 13.0, 8.0, 11.0, 11.0, 8.0, 15.0];

const LAST_COL: u16 = 7;
const HEADER_ROW: u32 = 3;
const FIRST_DATA_ROW: u32 = 4;
const METADATA_ROW_HEIGHT: f64 = 25.0;

// Dates outside the discharge/admission columns keep a full timestamp.
const DATETIME_FORMAT: &str = "yyyy-mm-dd h:mm:ss";

/// The fixed text of a box catalogue sheet.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub title: String,
    pub fonds_label: String,
    pub fonds_value: String,
    pub category_label: String,
    pub category_value: String,
    pub box_label: String,
    pub date_format: String,
    pub font_name: String,
}

impl From<&ReportConfig> for ReportLayout {
    fn from(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            fonds_label: config.fonds_label.clone(),
            fonds_value: config.fonds_value.clone(),
            category_label: config.category_label.clone(),
            category_value: config.category_value.clone(),
            box_label: config.box_label.clone(),
            date_format: config.date_format.clone(),
            font_name: config.font_name.clone(),
        }
    }
}

struct Styles {
    title: Format,
    metadata: Format,
    header: Format,
    plain: Format,
    centered: Format,
    date: Format,
    datetime: Format,
}

impl Styles {
    fn new(layout: &ReportLayout) -> Self {
        let plain = Format::new()
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::Black);
        let centered = plain
            .clone()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        Self {
            title: centered
                .clone()
                .set_font_name(&layout.font_name)
                .set_font_size(20)
                .set_bold(),
            metadata: centered
                .clone()
                .set_font_name(&layout.font_name)
                .set_font_size(16),
            header: centered.clone().set_bold(),
            date: plain.clone().set_num_format(&layout.date_format),
            datetime: plain.clone().set_num_format(DATETIME_FORMAT),
            plain,
            centered,
        }
    }
}

pub struct ReportBuilder {
    layout: ReportLayout,
}

impl ReportBuilder {
    pub fn new(layout: ReportLayout) -> Self {
        Self { layout }
    }

    /// Renders one box catalogue to `out_path`, numbering the records from
    /// `sequence_start`. Returns the first sequence number not used, which is
    /// where the next box continues.
    pub fn build(
        &self,
        records: &[Record],
        box_number: Option<u64>,
        sequence_start: u64,
        out_path: &Path,
    ) -> Result<u64> {
        let write_error = |e: XlsxError| BoxExportError::ReportWrite {
            path: out_path.display().to_string(),
            message: e.to_string(),
        };

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let next_sequence = self
            .render(sheet, records, box_number, sequence_start)
            .map_err(write_error)?;

        workbook.save(out_path).map_err(write_error)?;
        debug!(
            path = %out_path.display(),
            first = sequence_start,
            next = next_sequence,
            "wrote box catalogue"
        );

        Ok(next_sequence)
    }

    fn render(
        &self,
        sheet: &mut Worksheet,
        records: &[Record],
        box_number: Option<u64>,
        sequence_start: u64,
    ) -> std::result::Result<u64, XlsxError> {
        let styles = Styles::new(&self.layout);
        let layout = &self.layout;

        for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }

        // Row 1: title across the full width.
        sheet.merge_range(0, 0, 0, LAST_COL, &layout.title, &styles.title)?;
        sheet.set_row_height(0, METADATA_ROW_HEIGHT)?;

        // Row 2: fonds and category.
        for col in 0..4 {
            sheet.write_blank(1, col, &styles.plain)?;
        }
        sheet.write_string_with_format(1, 4, &layout.fonds_label, &styles.metadata)?;
        sheet.write_string_with_format(1, 5, &layout.fonds_value, &styles.metadata)?;
        sheet.write_string_with_format(1, 6, &layout.category_label, &styles.metadata)?;
        sheet.write_string_with_format(1, 7, &layout.category_value, &styles.metadata)?;
        sheet.set_row_height(1, METADATA_ROW_HEIGHT)?;

        // Row 3: box number.
        for col in 0..6 {
            sheet.write_blank(2, col, &styles.plain)?;
        }
        sheet.write_string_with_format(2, 6, &layout.box_label, &styles.metadata)?;
        match box_number {
            Some(number) => sheet.write_number_with_format(2, 7, number as f64, &styles.metadata)?,
            None => sheet.write_blank(2, 7, &styles.metadata)?,
        };
        sheet.set_row_height(2, METADATA_ROW_HEIGHT)?;

        for (col, header) in HEADERS.iter().enumerate() {
            sheet.write_string_with_format(HEADER_ROW, col as u16, *header, &styles.header)?;
        }

        let mut sequence = sequence_start;
        for (offset, record) in records.iter().enumerate() {
            let row = FIRST_DATA_ROW + offset as u32;

            sheet.write_number_with_format(row, 0, sequence as f64, &styles.centered)?;
            write_value(sheet, row, 1, &record.case_number, &styles.plain, &styles.datetime)?;
            write_value(sheet, row, 2, &record.department, &styles.plain, &styles.datetime)?;
            write_value(sheet, row, 3, &record.patient_name, &styles.plain, &styles.datetime)?;
            write_value(sheet, row, 4, &record.discharge_date, &styles.plain, &styles.date)?;
            write_value(sheet, row, 5, &record.admission_date, &styles.plain, &styles.date)?;
            write_value(sheet, row, 6, &record.image_count, &styles.centered, &styles.datetime)?;
            // Remarks are filled in by hand after printing.
            sheet.write_blank(row, 7, &styles.plain)?;

            sequence += 1;
        }

        Ok(sequence)
    }
}

/// Writes `value` with `format`, or with `date_format` when it is a date.
fn write_value(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
    date_format: &Format,
) -> std::result::Result<(), XlsxError> {
    match value {
        CellValue::Empty => sheet.write_blank(row, col, format)?,
        CellValue::Text(text) => sheet.write_string_with_format(row, col, text, format)?,
        CellValue::Number(number) => sheet.write_number_with_format(row, col, *number, format)?,
        CellValue::Bool(flag) => sheet.write_boolean_with_format(row, col, *flag, format)?,
        CellValue::DateTime(dt) => sheet.write_datetime_with_format(row, col, dt, date_format)?,
    };
    Ok(())
}

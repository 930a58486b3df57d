//! Đọc workbook XLSX/XLS thành lưới ô đã gắn thẻ kiểu

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::types::{Cell, RawRow};
use crate::M2Error;

/// Lưới ô của sheet đầu tiên trong workbook.
pub type Sheet = Vec<RawRow>;

/// Đọc sheet đầu tiên của một workbook Excel.
///
/// # Errors
///
/// Trả về `M2Error` nếu file không mở được, workbook không có sheet,
/// hoặc sheet không có dòng nào (cả ba đều chặn đợt nhập).
pub fn load_workbook(path: &Path) -> Result<Sheet, M2Error> {
    let mut workbook = open_workbook_auto(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| M2Error::MissingSheet(path.to_path_buf()))??;

    if range.height() == 0 {
        return Err(M2Error::EmptyFile(path.to_path_buf()));
    }

    let rows: Sheet = range.rows().map(convert_row).collect();
    debug!(rows = rows.len(), path = %path.display(), "Loaded workbook");

    Ok(rows)
}

fn convert_row(row: &[Data]) -> RawRow {
    row.iter().map(convert_cell).collect()
}

/// Gom các biến thể ô của calamine về ba thẻ Empty/Text/Number.
///
/// Ngày giờ Excel giữ dạng serial f64; ô lỗi coi như trống.
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

//! # m2form
//!
//! Parser cho biểu mẫu M2, bảng kê camera giám sát do các đơn vị
//! cơ sở khai và nộp dạng bảng tính.
//!
//! ## Đặc điểm của biểu mẫu
//!
//! - Bố cục vị trí cố định (≥ 42 cột), không đọc dòng tiêu đề cột
//! - Tiêu đề nhóm "I." .. "VI." ở cột đầu đặt nhãn hệ thống cho các
//!   dòng phía sau
//! - Nhóm checkbox (tick "x"/"✓") cho chế độ giám sát, lưu trữ, loại
//!   camera, kiểu dáng, kết nối mạng, khu vực lắp đặt
//! - Dòng đệm/ghi chú nằm xen kẽ và bị bỏ qua
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! let parsed = m2form::parse(Path::new("bang_ke.xlsx"))?;
//! for (i, row) in parsed.rows.iter().enumerate() {
//!     match row {
//!         Ok(record) => println!("{}: camera {:?}", i + 1, record.camera_index),
//!         Err(e) => println!("{}: lỗi {}", i + 1, e),
//!     }
//! }
//! ```

pub mod error;
pub mod parser;
pub mod records;
pub mod sheet;
pub mod types;

pub use error::M2Error;
pub use types::{CameraRecord, Cell, ParsedSheet, RowError};

use std::path::Path;

/// Đọc một file bảng kê và trả về các bản ghi camera theo thứ tự dòng.
///
/// Định dạng chọn theo phần mở rộng: `xlsx`/`xls` (bố cục M2),
/// `csv` (theo tên cột), `json` (danh sách bản ghi).
///
/// # Errors
///
/// Trả về [`M2Error`] khi file không đọc được, rỗng, hoặc sai định
/// dạng: các lỗi chặn cả đợt nhập. Lỗi từng dòng nằm trong
/// [`ParsedSheet::rows`].
pub fn parse(path: &Path) -> Result<ParsedSheet, M2Error> {
    match extension(path).as_deref() {
        Some("xlsx") | Some("xls") => {
            let rows = sheet::load_workbook(path)?;
            Ok(parser::parse_sheet(&rows))
        }
        Some("csv") => records::load_csv(path),
        Some("json") => records::load_json(path),
        _ => Err(M2Error::UnsupportedFormat(
            path.display().to_string(),
        )),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_unknown_extension() {
        let result = parse(Path::new("bang_ke.pdf"));
        assert!(matches!(result, Err(M2Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_parse_rejects_missing_extension() {
        let result = parse(Path::new("bang_ke"));
        assert!(matches!(result, Err(M2Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_extension_is_lowercased() {
        assert_eq!(extension(Path::new("a.XLSX")).as_deref(), Some("xlsx"));
        assert_eq!(extension(Path::new("a.Csv")).as_deref(), Some("csv"));
        assert_eq!(extension(Path::new("a")), None);
    }
}

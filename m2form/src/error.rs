//! Kiểu lỗi của crate m2form

use std::path::PathBuf;

use thiserror::Error;

/// Lỗi mức file khi đọc một bảng kê M2.
///
/// Đây là các lỗi chặn cả đợt nhập (file hỏng, sai định dạng, rỗng).
/// Lỗi mức dòng không nằm ở đây mà đi theo từng phần tử của
/// [`ParsedSheet::rows`](crate::types::ParsedSheet).
#[derive(Debug, Error)]
pub enum M2Error {
    /// Lỗi I/O khi đọc file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Phần mở rộng không thuộc các định dạng hỗ trợ
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Workbook hỏng hoặc không đọc được
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Workbook không có sheet nào
    #[error("Workbook has no worksheet: {}", .0.display())]
    MissingSheet(PathBuf),

    /// File không có dòng dữ liệu nào
    #[error("File is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    /// Lỗi cấu trúc CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON không parse được
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cấu trúc tài liệu không đúng quy ước
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

impl M2Error {
    /// Tạo lỗi cấu trúc với mô tả
    pub fn invalid_structure(reason: impl Into<String>) -> Self {
        Self::InvalidStructure(reason.into())
    }
}

//! Kiểu dữ liệu cho crate m2form

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Giá trị một ô, gắn thẻ kiểu ngay khi đọc file.
///
/// Mọi phép đọc "giống số" hay "được tick" về sau đều thao tác trên
/// ba thẻ này thay vì đoán kiểu từ chuỗi thô.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Ô trống hoặc ô lỗi
    #[default]
    Empty,
    /// Ô chữ
    Text(String),
    /// Ô số (Excel lưu mọi số dạng f64)
    Number(f64),
}

/// Một dòng thô: các ô theo đúng thứ tự cột của biểu mẫu.
pub type RawRow = Vec<Cell>;

/// Bản ghi camera chuẩn hóa, một dòng dữ liệu của biểu mẫu M2.
///
/// Các trường đều tùy chọn ở tầng parse; tầng nhập mới quyết định
/// trường nào bắt buộc. Sáu danh sách danh mục chứa nhãn chuẩn
/// suy từ các ô checkbox.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRecord {
    // Nhóm A – chủ sở hữu
    pub owner_name: Option<String>,
    pub organization_name: Option<String>,
    pub address_street: Option<String>,
    pub ward: Option<String>,
    pub province: Option<String>,
    pub phone: Option<String>,

    pub camera_index: Option<u32>,
    pub system_type: Option<String>,

    // Nhóm B – giám sát và lưu trữ
    pub monitoring_modes: Vec<String>,
    pub storage_types: Vec<String>,
    pub retention_days: Option<u32>,

    // Nhóm C – thông số kỹ thuật
    pub manufacturer: Option<String>,
    pub camera_types: Vec<String>,
    pub form_factors: Vec<String>,
    pub network_types: Vec<String>,

    // Nhóm D – vị trí lắp đặt
    pub install_areas: Vec<String>,
    /// Tọa độ thô đúng như người khai ghi, chưa chuẩn hóa
    pub latlon: Option<String>,

    // Nhóm E – tài khoản / kết nối
    pub login_user: Option<String>,
    pub login_password: Option<String>,
    pub login_domain: Option<String>,
    pub static_ip: Option<String>,
    pub ip_port: Option<String>,
    pub dvr_model: Option<String>,
    pub camera_model: Option<String>,

    // Nhóm F – đánh giá / phân loại
    pub resolution: Option<String>,
    pub bandwidth: Option<String>,
    pub serial_number: Option<String>,
    pub verification_code: Option<String>,
    pub category: Option<String>,
    pub sharing_scope: bool,
}

/// Lỗi mức dòng: dòng dữ liệu không phát sinh được bản ghi.
///
/// Không làm dừng đợt parse; người gọi kết toán theo vị trí dòng.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RowError {
    /// Thông điệp hiển thị cho người nhập liệu
    pub message: String,
    /// Nhãn hệ thống đang áp dụng cho dòng lỗi (nếu đã gặp tiêu đề)
    pub system_type: Option<String>,
}

/// Kết quả parse một file bảng kê.
#[derive(Debug, Default)]
pub struct ParsedSheet {
    /// Các dòng phát sinh, theo đúng thứ tự trong file.
    /// Vị trí 1-based trong vec này là "số dòng" dùng trong báo cáo lỗi.
    pub rows: Vec<Result<CameraRecord, RowError>>,

    /// Số dòng đệm/ghi chú đã bỏ qua (không phải lỗi)
    pub skipped: usize,
}

impl ParsedSheet {
    /// Số bản ghi đọc được
    pub fn record_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_ok()).count()
    }

    /// Số dòng lỗi ở tầng parse
    pub fn error_count(&self) -> usize {
        self.rows.len() - self.record_count()
    }
}

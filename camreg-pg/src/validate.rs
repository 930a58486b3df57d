//! Kiểm tra bản ghi trước khi ghi kho
//!
//! Mỗi lỗi là một giá trị [`ValidationError`] trả về qua `Result`;
//! tầng điều phối pattern-match trên kết quả, không dùng exception.

use m2form::CameraRecord;
use thiserror::Error;

use crate::import::entity::StagedCamera;

/// Lỗi khiến một dòng bị loại; không làm dừng đợt nhập.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Dòng dữ liệu không nằm dưới tiêu đề hệ thống nào
    #[error("Thiếu hệ thống camera")]
    MissingSystemType,

    /// Không có thứ tự camera
    #[error("Thiếu thứ tự camera")]
    MissingCameraIndex,

    /// Tọa độ có ghi nhưng không chuẩn hóa được
    #[error("Tọa độ không hợp lệ: {0}")]
    InvalidCoordinate(String),

    /// Số điện thoại sai định dạng
    #[error("Số điện thoại không hợp lệ: {0}")]
    InvalidPhone(String),
}

/// Số điện thoại hợp lệ: sau khi bỏ `+`, `-` và khoảng trắng phải
/// còn toàn chữ số, tối thiểu 8 ký tự.
pub fn phone_ok(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, '+' | '-') && !c.is_whitespace())
        .collect();

    cleaned.len() >= 8 && cleaned.chars().all(|c| c.is_ascii_digit())
}

/// Kiểm tra một bản ghi và dựng thực thể chờ ghi.
///
/// Thứ tự kiểm tra giữ nguyên quy trình nhập: hệ thống, thứ tự camera,
/// tọa độ (nếu có ghi), điện thoại (nếu có ghi). Tọa độ không chuẩn
/// hóa được là lỗi dòng, không âm thầm bỏ tọa độ để nhập tiếp.
pub fn validate_record(
    record: &CameraRecord,
    normalize_coord: fn(&str) -> Option<String>,
    phone_check: fn(&str) -> bool,
) -> Result<StagedCamera, ValidationError> {
    let system_type = record
        .system_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(ValidationError::MissingSystemType)?;

    let camera_index = record
        .camera_index
        .ok_or(ValidationError::MissingCameraIndex)?;

    let latlon = match record.latlon.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(
            normalize_coord(raw)
                .ok_or_else(|| ValidationError::InvalidCoordinate(raw.to_string()))?,
        ),
        None => None,
    };

    if let Some(phone) = record.phone.as_deref().filter(|s| !s.trim().is_empty()) {
        if !phone_check(phone) {
            return Err(ValidationError::InvalidPhone(phone.to_string()));
        }
    }

    Ok(StagedCamera::build(record, system_type, camera_index, latlon))
}

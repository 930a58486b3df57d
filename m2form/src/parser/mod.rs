//! Duyệt lưới ô của biểu mẫu M2 và phát sinh bản ghi camera
//!
//! Trạng thái duy nhất giữa các dòng là nhãn hệ thống hiện hành
//! (tiêu đề "I." .. "VI."), truyền tường minh qua vòng duyệt.
//! Mỗi dòng dữ liệu cho một `Result`: bản ghi hợp lệ hoặc lỗi dòng;
//! dòng đệm bị bỏ qua không kèm lỗi.

pub mod cells;
pub mod layout;

use tracing::debug;

use crate::types::{CameraRecord, Cell, ParsedSheet, RawRow, RowError};
use self::cells::{cell_text, extract_number, is_checked, is_numberish};

/// Phân loại một dòng của biểu mẫu.
enum RowKind<'a> {
    /// Tiêu đề nhóm hệ thống, đặt ngữ cảnh cho các dòng sau
    SectionHeader(&'a str),
    /// Dòng dữ liệu camera (ô đầu "giống số")
    Data,
    /// Dòng đệm/ghi chú, bỏ qua
    Spacer,
}

/// Duyệt toàn bộ lưới ô theo thứ tự dòng.
pub fn parse_sheet(rows: &[RawRow]) -> ParsedSheet {
    let mut parsed = ParsedSheet::default();
    let mut current_system: Option<&str> = None;

    for row in rows {
        match classify(row) {
            RowKind::SectionHeader(label) => current_system = Some(label),
            RowKind::Data => parsed.rows.push(parse_data_row(row, current_system)),
            RowKind::Spacer => parsed.skipped += 1,
        }
    }

    debug!(
        records = parsed.record_count(),
        row_errors = parsed.error_count(),
        skipped = parsed.skipped,
        "Parsed M2 sheet"
    );

    parsed
}

fn classify(row: &[Cell]) -> RowKind<'_> {
    let first = row.first().unwrap_or(&Cell::Empty);

    if let Cell::Text(s) = first {
        if let Some(label) = section_label(s) {
            return RowKind::SectionHeader(label);
        }
    }

    if is_numberish(first) {
        RowKind::Data
    } else {
        RowKind::Spacer
    }
}

/// Nhận diện tiêu đề nhóm: chữ số La Mã I..VI rồi dấu chấm ở đầu ô.
///
/// Trả về nguyên văn tiêu đề (đã bỏ khoảng trắng hai đầu); nhãn này
/// được gắn nguyên vẹn vào `system_type` của các bản ghi phía sau.
fn section_label(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let dot = trimmed.find('.')?;
    let numeral = &trimmed[..dot];

    matches!(numeral, "I" | "II" | "III" | "IV" | "V" | "VI").then_some(trimmed)
}

/// Đọc một dòng dữ liệu thành bản ghi camera.
fn parse_data_row(
    row: &[Cell],
    current_system: Option<&str>,
) -> Result<CameraRecord, RowError> {
    let cell = |idx: usize| row.get(idx).unwrap_or(&Cell::Empty);

    // Thứ tự camera có thể ghi "Camera 01" hoặc "(1)", lấy phần số.
    // Không trích được số thì dòng lỗi, không âm thầm để trống.
    let Some(camera_index) = extract_number(cell(layout::COL_CAMERA_INDEX)) else {
        let raw = cell_text(cell(layout::COL_CAMERA_INDEX)).unwrap_or_default();
        return Err(RowError {
            message: format!("Thiếu hoặc thứ tự camera không hợp lệ: {raw}"),
            system_type: current_system.map(str::to_string),
        });
    };

    let checked_labels = |group: &[(usize, &str)]| -> Vec<String> {
        group
            .iter()
            .filter(|(idx, _)| is_checked(cell(*idx)))
            .map(|(_, label)| (*label).to_string())
            .collect()
    };

    // Số ngày lưu chỉ nhận khi ô "giống số"
    let retention_cell = cell(layout::COL_RETENTION_DAYS);
    let retention_days = is_numberish(retention_cell)
        .then(|| extract_number(retention_cell))
        .flatten();

    Ok(CameraRecord {
        owner_name: cell_text(cell(layout::COL_OWNER_NAME)),
        organization_name: cell_text(cell(layout::COL_ORGANIZATION_NAME)),
        address_street: cell_text(cell(layout::COL_ADDRESS_STREET)),
        ward: cell_text(cell(layout::COL_WARD)),
        province: cell_text(cell(layout::COL_PROVINCE)),
        phone: cell_text(cell(layout::COL_PHONE)),

        camera_index: Some(camera_index),
        system_type: current_system.map(str::to_string),

        monitoring_modes: checked_labels(layout::MONITORING_MODES),
        storage_types: checked_labels(layout::STORAGE_TYPES),
        retention_days,

        manufacturer: cell_text(cell(layout::COL_MANUFACTURER)),
        camera_types: checked_labels(layout::CAMERA_TYPES),
        form_factors: checked_labels(layout::FORM_FACTORS),
        network_types: checked_labels(layout::NETWORK_TYPES),

        install_areas: checked_labels(layout::INSTALL_AREAS),
        latlon: cell_text(cell(layout::COL_LATLON)),

        login_user: cell_text(cell(layout::COL_LOGIN_USER)),
        login_password: cell_text(cell(layout::COL_LOGIN_PASSWORD)),
        login_domain: cell_text(cell(layout::COL_LOGIN_DOMAIN)),
        static_ip: cell_text(cell(layout::COL_STATIC_IP)),
        ip_port: cell_text(cell(layout::COL_IP_PORT)),
        dvr_model: cell_text(cell(layout::COL_DVR_MODEL)),
        camera_model: cell_text(cell(layout::COL_CAMERA_MODEL)),

        resolution: cell_text(cell(layout::COL_RESOLUTION)),
        bandwidth: cell_text(cell(layout::COL_BANDWIDTH)),
        serial_number: cell_text(cell(layout::COL_SERIAL_NUMBER)),
        verification_code: cell_text(cell(layout::COL_VERIFICATION_CODE)),
        category: cell_text(cell(layout::COL_CATEGORY)),
        sharing_scope: is_checked(cell(layout::COL_SHARING_SCOPE)),
    })
}

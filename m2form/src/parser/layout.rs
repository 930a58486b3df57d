//! Bố cục cột cố định của biểu mẫu M2
//!
//! Vị trí cột do mẫu in sẵn quy định (đánh số từ 0), không đọc dòng
//! tiêu đề. Các nhóm checkbox liệt kê cặp (cột, nhãn chuẩn): ô nào
//! được tick thì nhãn của cột đó vào danh sách tương ứng.

// Nhóm A – chủ sở hữu
pub const COL_OWNER_NAME: usize = 1;
pub const COL_ORGANIZATION_NAME: usize = 2;
pub const COL_ADDRESS_STREET: usize = 3;
pub const COL_WARD: usize = 4;
pub const COL_PROVINCE: usize = 5;
pub const COL_PHONE: usize = 6;
pub const COL_CAMERA_INDEX: usize = 7;

// Nhóm B – lưu trữ
pub const COL_RETENTION_DAYS: usize = 15;

// Nhóm C – thông số kỹ thuật
pub const COL_MANUFACTURER: usize = 16;

// Nhóm D – vị trí lắp đặt
pub const COL_LATLON: usize = 28;

// Nhóm E – tài khoản / kết nối
pub const COL_LOGIN_USER: usize = 29;
pub const COL_LOGIN_PASSWORD: usize = 30;
pub const COL_LOGIN_DOMAIN: usize = 31;
pub const COL_STATIC_IP: usize = 32;
pub const COL_IP_PORT: usize = 33;
pub const COL_DVR_MODEL: usize = 34;
pub const COL_CAMERA_MODEL: usize = 35;

// Nhóm F – đánh giá / phân loại
pub const COL_RESOLUTION: usize = 36;
pub const COL_BANDWIDTH: usize = 37;
pub const COL_SERIAL_NUMBER: usize = 38;
pub const COL_VERIFICATION_CODE: usize = 39;
pub const COL_CATEGORY: usize = 40;
pub const COL_SHARING_SCOPE: usize = 41;

/// Nhóm B – chế độ giám sát
pub const MONITORING_MODES: &[(usize, &str)] = &[
    (9, "Xem qua Internet"),
    (10, "Xem cục bộ"),
    (11, "Ghi"),
];

/// Nhóm B – hình thức lưu trữ
pub const STORAGE_TYPES: &[(usize, &str)] =
    &[(12, "Đầu ghi"), (13, "Thẻ nhớ"), (14, "Đám mây")];

/// Nhóm C – loại tín hiệu camera
pub const CAMERA_TYPES: &[(usize, &str)] = &[(17, "Analog"), (18, "IP")];

/// Nhóm C – kiểu dáng
pub const FORM_FACTORS: &[(usize, &str)] =
    &[(19, "Hộp ngoài"), (20, "Thân trụ"), (21, "Bán cầu")];

/// Nhóm C – kết nối mạng
pub const NETWORK_TYPES: &[(usize, &str)] =
    &[(22, "Có dây"), (23, "Wifi"), (24, "Di động")];

/// Nhóm D – khu vực lắp đặt
pub const INSTALL_AREAS: &[(usize, &str)] =
    &[(26, "Cổng và vỉa hè"), (27, "Ngoài đường")];

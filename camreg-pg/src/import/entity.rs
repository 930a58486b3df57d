//! Thực thể camera chờ ghi vào kho
//!
//! Đúng hình dạng cột của bảng `cameras`: trường vô hướng giữ nguyên,
//! sáu danh mục lưu dạng chuỗi JSON như ứng dụng web vẫn đọc, tọa độ
//! chuẩn hóa kèm hai cột số tách riêng cho truy vấn không gian.

use m2form::CameraRecord;

use crate::coord;

/// Bản ghi đã qua kiểm tra, sẵn sàng ghi trong một lô.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedCamera {
    pub owner_name: Option<String>,
    pub organization_name: Option<String>,
    pub address_street: Option<String>,
    pub ward: Option<String>,
    pub province: Option<String>,
    pub phone: Option<String>,

    pub camera_index: i32,
    pub system_type: String,

    /// Danh mục JSON, ví dụ `["Xem qua Internet","Ghi"]`
    pub monitoring_modes: String,
    pub storage_types: String,
    pub retention_days: Option<i32>,

    pub manufacturer: Option<String>,
    pub camera_types: String,
    pub form_factors: String,
    pub network_types: String,
    pub install_areas: String,

    /// Chuỗi "lat,lon" đã chuẩn hóa (6 chữ số lẻ)
    pub latlon: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub login_user: Option<String>,
    pub login_password: Option<String>,
    pub login_domain: Option<String>,
    pub static_ip: Option<String>,
    pub ip_port: Option<String>,
    pub dvr_model: Option<String>,
    pub camera_model: Option<String>,

    pub resolution: Option<String>,
    pub bandwidth: Option<String>,
    pub serial_number: Option<String>,
    pub verification_code: Option<String>,
    pub category: Option<String>,
    pub sharing_scope: bool,
}

impl StagedCamera {
    /// Dựng thực thể từ bản ghi đã kiểm tra.
    ///
    /// `latlon` là tọa độ ĐÃ chuẩn hóa (hoặc None nếu không khai);
    /// hai cột số tách từ chính chuỗi đó.
    pub(crate) fn build(
        record: &CameraRecord,
        system_type: &str,
        camera_index: u32,
        latlon: Option<String>,
    ) -> Self {
        let (latitude, longitude) = match latlon.as_deref().and_then(coord::split_components) {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        };

        Self {
            owner_name: record.owner_name.clone(),
            organization_name: record.organization_name.clone(),
            address_street: record.address_street.clone(),
            ward: record.ward.clone(),
            province: record.province.clone(),
            phone: record.phone.clone(),

            camera_index: camera_index as i32,
            system_type: system_type.to_string(),

            monitoring_modes: to_json(&record.monitoring_modes),
            storage_types: to_json(&record.storage_types),
            retention_days: record.retention_days.map(|d| d as i32),

            manufacturer: record.manufacturer.clone(),
            camera_types: to_json(&record.camera_types),
            form_factors: to_json(&record.form_factors),
            network_types: to_json(&record.network_types),
            install_areas: to_json(&record.install_areas),

            latlon,
            latitude,
            longitude,

            login_user: record.login_user.clone(),
            login_password: record.login_password.clone(),
            login_domain: record.login_domain.clone(),
            static_ip: record.static_ip.clone(),
            ip_port: record.ip_port.clone(),
            dvr_model: record.dvr_model.clone(),
            camera_model: record.camera_model.clone(),

            resolution: record.resolution.clone(),
            bandwidth: record.bandwidth.clone(),
            serial_number: record.serial_number.clone(),
            verification_code: record.verification_code.clone(),
            category: record.category.clone(),
            sharing_scope: record.sharing_scope,
        }
    }
}

/// JSON hóa một danh sách nhãn.
fn to_json(labels: &[String]) -> String {
    serde_json::to_string(labels).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_serializes_category_lists() {
        let record = CameraRecord {
            camera_index: Some(2),
            system_type: Some("I. Hệ thống A".into()),
            monitoring_modes: vec!["Xem qua Internet".into(), "Ghi".into()],
            camera_types: vec!["IP".into()],
            ..Default::default()
        };

        let staged = StagedCamera::build(&record, "I. Hệ thống A", 2, None);

        assert_eq!(staged.monitoring_modes, r#"["Xem qua Internet","Ghi"]"#);
        assert_eq!(staged.camera_types, r#"["IP"]"#);
        assert_eq!(staged.storage_types, "[]");
    }

    #[test]
    fn test_build_splits_latlon_components() {
        let record = CameraRecord {
            camera_index: Some(1),
            system_type: Some("I. Hệ thống A".into()),
            ..Default::default()
        };

        let staged = StagedCamera::build(
            &record,
            "I. Hệ thống A",
            1,
            Some("19.790694,105.778417".into()),
        );

        assert_eq!(staged.latlon.as_deref(), Some("19.790694,105.778417"));
        assert_eq!(staged.latitude, Some(19.790694));
        assert_eq!(staged.longitude, Some(105.778417));
    }

    #[test]
    fn test_build_without_latlon() {
        let record = CameraRecord {
            camera_index: Some(1),
            system_type: Some("I. Hệ thống A".into()),
            retention_days: Some(30),
            ..Default::default()
        };

        let staged = StagedCamera::build(&record, "I. Hệ thống A", 1, None);

        assert_eq!(staged.latlon, None);
        assert_eq!(staged.latitude, None);
        assert_eq!(staged.longitude, None);
        assert_eq!(staged.retention_days, Some(30));
    }
}

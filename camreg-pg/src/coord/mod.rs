//! Chuẩn hóa tọa độ về chuỗi "lat,lon" độ thập phân, 6 chữ số lẻ
//!
//! Cột tọa độ của bảng kê do nhiều người khai trên nhiều máy khác
//! nhau, cùng một cột gặp đủ cách ghi:
//!
//! - Thập phân: `19.790694,105.778417`, `19.7899904 105.7750516`
//! - Thập phân kiểu dấu phẩy: `19,790694 105,7750516`
//! - Trộn lẫn hai kiểu: `19.8014657 105,7761047`
//! - Độ-phút-giây: `19°47'26.5"N 105°46'42.3"E`
//!
//! Hàm [`normalize`] là hàm thuần và toàn phần: đầu vào không đọc
//! được trả về `None`, không bao giờ panic.

mod decimal;
mod dms;

use std::ops::RangeInclusive;

/// Khoảng vĩ độ hợp lệ
const LAT_RANGE: RangeInclusive<f64> = -90.0..=90.0;
/// Khoảng kinh độ hợp lệ
const LON_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Chuẩn hóa một chuỗi tọa độ thô về dạng `"lat,lon"`.
///
/// Chuỗi có dấu độ/phút/giây hoặc chữ hướng (N/S/E/W) đi nhánh DMS,
/// còn lại đi nhánh thập phân. Cả hai nhánh đều qua kiểm tra khoảng
/// trước khi định dạng.
pub fn normalize(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (lat, lon) = if dms::looks_like_dms(raw) {
        dms::parse_pair(raw)?
    } else {
        decimal::parse_pair(raw)?
    };

    format_pair(lat, lon)
}

/// Tách chuỗi `"lat,lon"` đã chuẩn hóa thành cặp số.
///
/// Dùng cho hai cột tra cứu không gian lưu song song với chuỗi.
pub fn split_components(latlon: &str) -> Option<(f64, f64)> {
    let (lat, lon) = latlon.split_once(',')?;
    let lat = fast_float::parse::<f64, _>(lat.trim()).ok()?;
    let lon = fast_float::parse::<f64, _>(lon.trim()).ok()?;
    Some((lat, lon))
}

/// Kiểm tra khoảng và định dạng 6 chữ số lẻ.
fn format_pair(lat: f64, lon: f64) -> Option<String> {
    if !LAT_RANGE.contains(&lat) || !LON_RANGE.contains(&lon) {
        return None;
    }
    Some(format!("{lat:.6},{lon:.6}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_passthrough() {
        assert_eq!(
            normalize("19.790694,105.778417").as_deref(),
            Some("19.790694,105.778417")
        );
    }

    #[test]
    fn test_comma_decimal_space_separated() {
        assert_eq!(
            normalize("19,790694 105,7750516").as_deref(),
            Some("19.790694,105.775052")
        );
    }

    #[test]
    fn test_space_separated_dots() {
        assert_eq!(
            normalize("19.7899904 105.7750516").as_deref(),
            Some("19.789990,105.775052")
        );
    }

    #[test]
    fn test_mixed_decimal_marks() {
        assert_eq!(
            normalize("19.8014657 105,7761047").as_deref(),
            Some("19.801466,105.776105")
        );
    }

    #[test]
    fn test_semicolon_separator_with_comma_decimals() {
        assert_eq!(
            normalize("19,790694;105,778417").as_deref(),
            Some("19.790694,105.778417")
        );
    }

    #[test]
    fn test_comma_decimals_without_separator_rejected() {
        assert_eq!(normalize("19,790694,105,778417"), None);
    }

    #[test]
    fn test_dms_with_directions() {
        let result = normalize("19°47'26.5\"N 105°46'42.3\"E").unwrap();
        let (lat, lon) = split_components(&result).unwrap();
        assert!((lat - 19.790694).abs() < 1e-4, "lat={lat}");
        assert!((lon - 105.778417).abs() < 1e-4, "lon={lon}");
    }

    #[test]
    fn test_dms_south_west_negative() {
        let result = normalize("19°47'26.5\"S 105°46'42.3\"W").unwrap();
        let (lat, lon) = split_components(&result).unwrap();
        assert!(lat < 0.0);
        assert!(lon < 0.0);
    }

    #[test]
    fn test_dms_without_directions_positional() {
        // Hai cụm không chữ hướng: cụm đầu là vĩ độ, cụm sau là kinh độ
        let result = normalize("19°47'26.5\" 105°46'42.3\"").unwrap();
        let (lat, lon) = split_components(&result).unwrap();
        assert!((lat - 19.790694).abs() < 1e-4);
        assert!((lon - 105.778417).abs() < 1e-4);
    }

    #[test]
    fn test_dms_single_triple_rejected() {
        // Một cụm đơn lẻ không đoán được cặp, từ chối
        assert_eq!(normalize("19°47'26.5\"N"), None);
        assert_eq!(normalize("19°47'26.5\""), None);
    }

    #[test]
    fn test_latitude_out_of_range() {
        assert_eq!(normalize("200.0,50.0"), None);
    }

    #[test]
    fn test_longitude_out_of_range() {
        assert_eq!(normalize("50.0,200.0"), None);
    }

    #[test]
    fn test_garbage_input() {
        assert_eq!(normalize("not a coordinate"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("..,,.."), None);
    }

    #[test]
    fn test_negative_coordinates() {
        assert_eq!(
            normalize("-19.790694,-105.778417").as_deref(),
            Some("-19.790694,-105.778417")
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "19.790694,105.778417",
            "19,790694 105,7750516",
            "19.8014657 105,7761047",
            "-33.856784 151.215297",
            "19°47'26.5\"N 105°46'42.3\"E",
            "0.0,0.0",
            "90.0,180.0",
            "-90.0,-180.0",
        ];

        for input in inputs {
            let once = normalize(input).unwrap();
            let twice = normalize(&once).unwrap();
            assert_eq!(once, twice, "không lũy đẳng với đầu vào {input:?}");
        }
    }

    #[test]
    fn test_split_components() {
        assert_eq!(
            split_components("19.790694,105.778417"),
            Some((19.790694, 105.778417))
        );
        assert_eq!(split_components("19.79"), None);
        assert_eq!(split_components("a,b"), None);
    }

    #[test]
    fn test_boundary_values_accepted() {
        assert_eq!(normalize("90,180").as_deref(), Some("90.000000,180.000000"));
        assert_eq!(
            normalize("-90 -180").as_deref(),
            Some("-90.000000,-180.000000")
        );
        assert_eq!(normalize("90.000001,0.0"), None);
    }
}

//! Đọc tọa độ thập phân với dấu tách và dấu lẻ không thống nhất
//!
//! Phải đoán dấu tách cặp trước (khoảng trắng / phẩy / chấm phẩy),
//! rồi mới chuẩn hóa dấu thập phân trên từng nửa một cách độc lập:
//! cùng một chuỗi có thể nửa này dùng chấm, nửa kia dùng phẩy.

/// Tách cặp (vĩ độ, kinh độ) từ một chuỗi thập phân.
pub(super) fn parse_pair(raw: &str) -> Option<(f64, f64)> {
    let (lat_half, lon_half) = split_halves(raw)?;
    let lat = parse_half(lat_half)?;
    let lon = parse_half(lon_half)?;
    Some((lat, lon))
}

/// Đoán dấu tách cặp, theo thứ tự ưu tiên:
///
/// 1. Có khoảng trắng: tách tại cụm khoảng trắng đầu tiên
/// 2. Một phẩy + từ hai chấm trở lên: phẩy là dấu tách, chấm là dấu lẻ
/// 3. Từ hai phẩy trở lên (và dưới hai chấm): bắt buộc có chấm phẩy,
///    không có thì chịu, không đoán được
/// 4. Một phẩy, không chấm: phẩy là dấu tách
/// 5. Còn lại: thử lại khoảng trắng (không có thì thất bại)
fn split_halves(raw: &str) -> Option<(&str, &str)> {
    let dots = raw.matches('.').count();
    let commas = raw.matches(',').count();

    if raw.contains(char::is_whitespace) {
        return split_whitespace_once(raw);
    }
    if commas == 1 && dots >= 2 {
        return raw.split_once(',');
    }
    if commas >= 2 && dots < 2 {
        return raw.split_once(';');
    }
    if commas == 1 && dots == 0 {
        return raw.split_once(',');
    }
    split_whitespace_once(raw)
}

/// Tách tại cụm khoảng trắng đầu tiên, phần sau giữ nguyên.
fn split_whitespace_once(raw: &str) -> Option<(&str, &str)> {
    let start = raw.find(char::is_whitespace)?;
    let first = &raw[..start];
    let rest = raw[start..].trim_start();
    (!rest.is_empty()).then_some((first, rest))
}

/// Chuẩn hóa dấu thập phân của một nửa rồi parse số.
///
/// Nửa có chấm: chấm là dấu lẻ, phẩy (nếu có) là rác phân nhóm.
/// Nửa chỉ có phẩy: phẩy chính là dấu lẻ.
fn parse_half(half: &str) -> Option<f64> {
    let half = half.trim();

    let mut cleaned = if half.contains('.') {
        half.replace(',', "")
    } else if half.contains(',') {
        half.replace(',', ".")
    } else {
        half.to_string()
    };

    // Giữ lại chữ số, dấu chấm và dấu +/-; ký tự khác là rác
    cleaned.retain(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'));

    fast_float::parse::<f64, _>(cleaned.as_str()).ok()
}

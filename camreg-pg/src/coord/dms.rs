//! Đọc tọa độ ghi kiểu độ-phút-giây (DMS)
//!
//! Một cụm DMS là ba con số `độ phút giây[.lẻ]` ngăn bởi ký tự bất kỳ
//! không phải chữ số, kèm chữ hướng tùy chọn trước hoặc sau cụm.
//! Cụm có N/S gán vào vĩ độ, E/W vào kinh độ; cụm không chữ hướng gán
//! theo vị trí (cụm đầu là vĩ độ, cụm sau là kinh độ, quy ước N/E).
//! Chuỗi chỉ có một cụm bị từ chối thay vì đoán thành cả cặp.

use std::sync::OnceLock;

use regex::Regex;

/// Chuỗi có dấu độ/phút/giây hoặc chữ hướng thì coi là DMS.
pub(super) fn looks_like_dms(raw: &str) -> bool {
    raw.contains(['°', '\'', '"'])
        || raw
            .chars()
            .any(|c| matches!(c.to_ascii_uppercase(), 'N' | 'S' | 'E' | 'W'))
}

/// Một cụm `độ [°] phút ['] giây ["]` với chữ hướng tùy chọn.
fn triple_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)([NSEW])?\s*(\d+)[^\dNSEW]+(\d+)[^\dNSEW]+(\d+(?:\.\d+)?)["'\s]*([NSEW])?"#,
        )
        .expect("DMS triple pattern")
    })
}

/// Tách cặp (vĩ độ, kinh độ) từ một chuỗi DMS.
pub(super) fn parse_pair(raw: &str) -> Option<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;
    let mut positional: Vec<f64> = Vec::new();

    for caps in triple_re().captures_iter(raw) {
        let degrees: f64 = caps[2].parse().ok()?;
        let minutes: f64 = caps[3].parse().ok()?;
        let seconds: f64 = fast_float::parse::<f64, _>(&caps[4]).ok()?;
        let value = degrees + minutes / 60.0 + seconds / 3600.0;

        // Chữ hướng sau cụm ưu tiên hơn chữ hướng trước cụm
        let direction = caps
            .get(5)
            .or_else(|| caps.get(1))
            .map(|m| m.as_str().to_ascii_uppercase());

        match direction.as_deref() {
            Some("N") => assign(&mut lat, value)?,
            Some("S") => assign(&mut lat, -value)?,
            Some("E") => assign(&mut lon, value)?,
            Some("W") => assign(&mut lon, -value)?,
            _ => positional.push(value),
        }
    }

    let mut positional = positional.into_iter();
    let lat = lat.or_else(|| positional.next())?;
    let lon = lon.or_else(|| positional.next())?;
    Some((lat, lon))
}

/// Hai cụm cùng đòi một trục là mơ hồ: từ chối thay vì đoán.
fn assign(slot: &mut Option<f64>, value: f64) -> Option<()> {
    if slot.is_some() {
        return None;
    }
    *slot = Some(value);
    Some(())
}

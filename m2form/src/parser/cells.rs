//! Hàm đọc giá trị ô: dấu tick, trích số, ép chuỗi

use crate::types::Cell;

/// Ô được tick khi nội dung (bỏ khoảng trắng, không phân biệt hoa
/// thường) là "x" hoặc dấu "✓".
#[inline]
pub fn is_checked(cell: &Cell) -> bool {
    match cell {
        Cell::Text(s) => matches!(s.trim().to_lowercase().as_str(), "x" | "✓"),
        _ => false,
    }
}

/// Kiểm tra "giống số" theo nghĩa lỏng của biểu mẫu: ô số thật sự,
/// hoặc ô chữ có chứa chữ số ở bất kỳ đâu ("Camera 01", "(16)").
#[inline]
pub fn is_numberish(cell: &Cell) -> bool {
    match cell {
        Cell::Number(_) => true,
        Cell::Text(s) => s.bytes().any(|b| b.is_ascii_digit()),
        Cell::Empty => false,
    }
}

/// Trích cụm chữ số đầu tiên: "Camera 01" -> 1, "(16)" -> 16, "30" -> 30.
///
/// Ô số lấy phần nguyên. Không có chữ số nào thì trả về None.
pub fn extract_number(cell: &Cell) -> Option<u32> {
    match cell {
        Cell::Number(f) => Some(f.abs().trunc() as u32),
        Cell::Text(s) => first_digit_run(s),
        Cell::Empty => None,
    }
}

/// Cụm chữ số liên tiếp đầu tiên trong chuỗi.
fn first_digit_run(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |len| start + len);
    s[start..end].parse().ok()
}

/// Ép ô về chuỗi hiển thị; ô trống (hoặc chỉ khoảng trắng) cho None.
///
/// Số nguyên Excel in không kèm phần lẻ ("30" thay vì "30.0").
pub fn cell_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Cell::Number(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    #[test]
    fn test_is_checked() {
        assert!(is_checked(&text("x")));
        assert!(is_checked(&text("X")));
        assert!(is_checked(&text(" ✓ ")));
        assert!(!is_checked(&text("xx")));
        assert!(!is_checked(&text("")));
        assert!(!is_checked(&Cell::Number(1.0)));
        assert!(!is_checked(&Cell::Empty));
    }

    #[test]
    fn test_is_numberish() {
        assert!(is_numberish(&Cell::Number(7.0)));
        assert!(is_numberish(&text("30")));
        assert!(is_numberish(&text("Camera 01")));
        assert!(is_numberish(&text("(16)")));
        assert!(!is_numberish(&text("Ghi chú")));
        assert!(!is_numberish(&Cell::Empty));
    }

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number(&text("Camera 01")), Some(1));
        assert_eq!(extract_number(&text("(16)")), Some(16));
        assert_eq!(extract_number(&text("30")), Some(30));
        assert_eq!(extract_number(&Cell::Number(7.0)), Some(7));
        assert_eq!(extract_number(&Cell::Number(7.9)), Some(7));
        assert_eq!(extract_number(&text("không có")), None);
        assert_eq!(extract_number(&Cell::Empty), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&text("  Thanh Hóa  ")), Some("Thanh Hóa".into()));
        assert_eq!(cell_text(&text("   ")), None);
        assert_eq!(cell_text(&Cell::Number(30.0)), Some("30".into()));
        assert_eq!(cell_text(&Cell::Number(19.79)), Some("19.79".into()));
        assert_eq!(cell_text(&Cell::Empty), None);
    }
}

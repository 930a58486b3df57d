//! Test tích hợp trên lưới ô tổng hợp và file CSV/JSON thật

use std::io::Write;

use m2form::parser::{self, layout};
use m2form::types::{Cell, RawRow};
use m2form::M2Error;

fn text(s: &str) -> Cell {
    Cell::Text(s.into())
}

fn header(label: &str) -> RawRow {
    let mut row = vec![Cell::Empty; 42];
    row[0] = text(label);
    row
}

fn camera(index: &str, owner: &str, latlon: &str) -> RawRow {
    let mut row = vec![Cell::Empty; 42];
    row[0] = text(index);
    row[layout::COL_OWNER_NAME] = text(owner);
    row[layout::COL_CAMERA_INDEX] = text(index);
    row[layout::COL_LATLON] = text(latlon);
    row
}

fn spacer(note: &str) -> RawRow {
    let mut row = vec![Cell::Empty; 42];
    row[0] = text(note);
    row
}

#[test]
fn test_full_sheet_walkthrough() {
    let rows = vec![
        spacer("BẢNG KÊ CAMERA GIÁM SÁT"),
        spacer(""),
        header("I. Hệ thống A"),
        camera("1", "Nguyễn Văn A", "19.790694,105.778417"),
        camera("Camera 02", "Trần Thị B", "19,79 105,78"),
        spacer("---"),
        header("II. Hệ thống B"),
        camera("(3)", "Lê Văn C", ""),
    ];

    let parsed = parser::parse_sheet(&rows);

    assert_eq!(parsed.record_count(), 3);
    assert_eq!(parsed.error_count(), 0);
    assert_eq!(parsed.skipped, 3);

    let records: Vec<_> = parsed
        .rows
        .iter()
        .map(|r| r.as_ref().unwrap())
        .collect();

    assert_eq!(records[0].camera_index, Some(1));
    assert_eq!(records[0].system_type.as_deref(), Some("I. Hệ thống A"));
    assert_eq!(records[1].camera_index, Some(2));
    assert_eq!(records[1].system_type.as_deref(), Some("I. Hệ thống A"));
    assert_eq!(records[2].camera_index, Some(3));
    assert_eq!(records[2].system_type.as_deref(), Some("II. Hệ thống B"));
    assert_eq!(records[2].latlon, None);
}

#[test]
fn test_rows_before_first_header_have_no_system() {
    let rows = vec![camera("1", "A", ""), header("I. Hệ thống A")];
    let parsed = parser::parse_sheet(&rows);

    assert_eq!(parsed.record_count(), 1);
    assert_eq!(parsed.rows[0].as_ref().unwrap().system_type, None);
}

#[test]
fn test_parse_csv_file_end_to_end() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "owner_name,camera_index,system_type,phone").unwrap();
    writeln!(file, "Nguyễn Văn A,1,I. Hệ thống A,0912345678").unwrap();
    writeln!(file, "Trần Thị B,Camera 02,I. Hệ thống A,").unwrap();
    let path = file.into_temp_path();

    let parsed = m2form::parse(&path).unwrap();
    assert_eq!(parsed.rows.len(), 2);
    assert!(parsed.rows[0].is_ok());
    // "Camera 02" không phải số nguyên: CSV không trích số như bố cục M2
    assert!(parsed.rows[1].is_err());
}

#[test]
fn test_parse_json_file_end_to_end() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"cameras": [{{"camera_index": 5, "system_type": "IV. Hệ thống D", "latlon": "19.79,105.78"}}]}}"#
    )
    .unwrap();
    let path = file.into_temp_path();

    let parsed = m2form::parse(&path).unwrap();
    assert_eq!(parsed.record_count(), 1);

    let record = parsed.rows[0].as_ref().unwrap();
    assert_eq!(record.camera_index, Some(5));
    assert_eq!(record.system_type.as_deref(), Some("IV. Hệ thống D"));
}

#[test]
fn test_parse_missing_file_is_fatal() {
    let result = m2form::parse(std::path::Path::new("khong_ton_tai.xlsx"));
    assert!(result.is_err());
}

#[test]
fn test_parse_unknown_extension_is_fatal() {
    let result = m2form::parse(std::path::Path::new("bang_ke.docx"));
    assert!(matches!(result, Err(M2Error::UnsupportedFormat(_))));
}

//! Đọc bản ghi từ CSV (theo tên cột) và JSON
//!
//! Hai định dạng này không theo bố cục vị trí của mẫu M2: CSV đặt tên
//! cột trùng tên trường, JSON là danh sách bản ghi. Dòng hỏng cho một
//! lỗi dòng, không chặn cả file.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::types::{CameraRecord, ParsedSheet, RowError};
use crate::M2Error;

/// Đọc CSV theo tên cột; mỗi dòng deserialize thẳng vào [`CameraRecord`].
///
/// Chấp nhận BOM UTF-8 ở đầu file (Excel hay chèn khi xuất CSV).
pub fn load_csv(path: &Path) -> Result<ParsedSheet, M2Error> {
    let bytes = std::fs::read(path)?;
    let text = decode_utf8(&bytes);

    if text.trim().is_empty() {
        return Err(M2Error::EmptyFile(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut parsed = ParsedSheet::default();
    for result in reader.deserialize::<CameraRecord>() {
        match result {
            Ok(record) => parsed.rows.push(Ok(record)),
            Err(e) => parsed.rows.push(Err(RowError {
                message: format!("Dòng CSV không hợp lệ: {e}"),
                system_type: None,
            })),
        }
    }

    debug!(rows = parsed.rows.len(), path = %path.display(), "Loaded CSV records");
    Ok(parsed)
}

/// Đọc JSON: mảng bản ghi, object `{"cameras": [...]}`, hoặc một bản ghi đơn.
pub fn load_json(path: &Path) -> Result<ParsedSheet, M2Error> {
    let bytes = std::fs::read(path)?;
    let value: Value = serde_json::from_slice(&bytes)?;

    let items: Vec<Value> = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("cameras") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(M2Error::invalid_structure(
                    "trường 'cameras' phải là một mảng",
                ))
            }
            None => vec![Value::Object(map)],
        },
        _ => {
            return Err(M2Error::invalid_structure(
                "JSON phải là mảng bản ghi hoặc object",
            ))
        }
    };

    if items.is_empty() {
        return Err(M2Error::EmptyFile(path.to_path_buf()));
    }

    let mut parsed = ParsedSheet::default();
    for item in items {
        match serde_json::from_value::<CameraRecord>(item) {
            Ok(record) => parsed.rows.push(Ok(record)),
            Err(e) => parsed.rows.push(Err(RowError {
                message: format!("Bản ghi JSON không hợp lệ: {e}"),
                system_type: None,
            })),
        }
    }

    debug!(rows = parsed.rows.len(), path = %path.display(), "Loaded JSON records");
    Ok(parsed)
}

/// Bỏ BOM và decode UTF-8, thay thế byte hỏng.
fn decode_utf8(bytes: &[u8]) -> String {
    let (text, _, _) = encoding_rs::UTF_8.decode(bytes);
    text.into_owned()
}

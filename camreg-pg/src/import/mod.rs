//! Điều phối nhập: kiểm tra từng dòng, gom lô, ghi kho, kết toán lỗi
//!
//! Một đợt nhập chạy tuần tự trên các dòng đã parse, đúng thứ tự file.
//! Không một lỗi dòng nào làm dừng đợt: dòng lỗi vào báo cáo, đợt đi
//! tiếp. Lỗi mức file bị chặn từ trước khi gọi vào đây.
//!
//! Mỗi đợt sở hữu trọn trạng thái của mình (báo cáo, lô đang chờ);
//! nhiều đợt chạy song song trên các file khác nhau không chia sẻ gì.

pub mod cache;
pub mod entity;
pub mod pool;
pub mod postgres;
pub mod store;

use std::time::Instant;

use m2form::ParsedSheet;
use tracing::{error, info, warn};

use crate::coord;
use crate::report::ImportReport;
use crate::validate::{self, validate_record};
use entity::StagedCamera;
use store::{CameraStore, StatsCache};

/// Kích thước lô mặc định: commit mỗi 100 bản ghi.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Tùy chọn một đợt nhập.
///
/// Hai hàm kiểm tra được tiêm từ ngoài để đường nhập file và đường
/// sửa tay của ứng dụng web dùng chung một chuẩn.
#[derive(Clone, Copy)]
pub struct ImportOptions {
    /// Số bản ghi mỗi transaction
    pub batch_size: usize,
    /// Chuẩn hóa tọa độ thô về "lat,lon"
    pub normalize_coord: fn(&str) -> Option<String>,
    /// Kiểm tra số điện thoại
    pub validate_phone: fn(&str) -> bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            normalize_coord: coord::normalize,
            validate_phone: validate::phone_ok,
        }
    }
}

impl ImportOptions {
    /// Kích thước lô từ env `CAMREG_BATCH_SIZE`, sai hoặc thiếu thì
    /// dùng mặc định.
    pub fn batch_size_from_env() -> usize {
        std::env::var("CAMREG_BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_BATCH_SIZE)
    }
}

/// Chạy một đợt nhập trên các dòng đã parse.
pub async fn run_import<S, C>(
    store: &mut S,
    cache: &C,
    parsed: &ParsedSheet,
    opts: &ImportOptions,
    file_label: &str,
) -> ImportReport
where
    S: CameraStore,
    C: StatsCache,
{
    let started = Instant::now();
    let mut report = ImportReport::new(file_label);
    report.skipped_rows = parsed.skipped;

    info!(
        file = file_label,
        records = parsed.rows.len(),
        batch_size = opts.batch_size,
        "Starting import"
    );

    // Lô đang chờ: (số dòng, thực thể)
    let mut staged: Vec<(usize, StagedCamera)> = Vec::with_capacity(opts.batch_size);

    for (idx, outcome) in parsed.rows.iter().enumerate() {
        let row_no = idx + 1;

        let record = match outcome {
            Ok(record) => record,
            Err(row_err) => {
                warn!(row = row_no, error = %row_err, "Parser row error");
                report.record_row_error(
                    row_no,
                    row_err.message.clone(),
                    context_info(row_err.system_type.as_deref(), None),
                    row_err.system_type.as_deref(),
                );
                continue;
            }
        };

        match validate_record(record, opts.normalize_coord, opts.validate_phone) {
            Ok(camera) => {
                staged.push((row_no, camera));
                if staged.len() >= opts.batch_size {
                    flush(store, &mut staged, &mut report).await;
                }
            }
            Err(err) => {
                warn!(row = row_no, error = %err, "Validation error");
                report.record_row_error(
                    row_no,
                    err.to_string(),
                    context_info(record.system_type.as_deref(), record.camera_index),
                    record.system_type.as_deref(),
                );
            }
        }
    }

    // Lô cuối chưa đầy vẫn phải ghi
    flush(store, &mut staged, &mut report).await;

    // Số liệu dashboard phụ thuộc bộ sưu tập camera: làm tươi một lần
    // cuối đợt; lỗi cache chỉ cảnh báo, không tính vào kết quả nhập
    if let Err(e) = cache.invalidate().await {
        warn!(error = %e, "Stats cache invalidation failed");
    }

    report.finalize(started.elapsed());
    info!(
        file = file_label,
        success = report.success,
        errors = report.errors,
        "Import finished"
    );

    report
}

/// Ghi lô đang chờ trong một transaction.
///
/// Lỗi ghi quy cho trọn dải dòng của lô; đợt nhập tiếp tục với
/// transaction mới cho các dòng sau.
async fn flush<S: CameraStore>(
    store: &mut S,
    staged: &mut Vec<(usize, StagedCamera)>,
    report: &mut ImportReport,
) {
    if staged.is_empty() {
        return;
    }

    let batch: Vec<StagedCamera> = staged.iter().map(|(_, camera)| camera.clone()).collect();

    match store.insert_batch(&batch).await {
        Ok(()) => {
            for (_, camera) in staged.drain(..) {
                report.record_imported(&camera.system_type);
            }
        }
        Err(e) => {
            let first_row = staged.first().map_or(0, |(row, _)| *row);
            let last_row = staged.last().map_or(0, |(row, _)| *row);
            error!(
                first_row,
                last_row,
                error = %e,
                "Batch commit failed, rolled back"
            );

            let systems: Vec<String> = staged
                .drain(..)
                .map(|(_, camera)| camera.system_type)
                .collect();
            report.record_flush_failure(
                first_row,
                last_row,
                &systems,
                format!("Database error: {e}"),
            );
        }
    }
}

/// Ngữ cảnh hiển thị kèm lỗi, đúng định dạng ứng dụng web.
fn context_info(system_type: Option<&str>, camera_index: Option<u32>) -> String {
    let mut info = String::new();
    if let Some(system) = system_type {
        info.push_str(&format!(" - Hệ thống: {system}"));
    }
    if let Some(index) = camera_index {
        info.push_str(&format!(", Thứ tự: {index}"));
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use m2form::{CameraRecord, RowError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Kho giả: ghi lại kích thước từng lô, có thể hẹn lô nào lỗi.
    #[derive(Default)]
    struct FakeStore {
        batches: Vec<usize>,
        fail_on_call: Option<usize>,
    }

    #[async_trait]
    impl CameraStore for FakeStore {
        async fn insert_batch(&mut self, batch: &[StagedCamera]) -> Result<()> {
            self.batches.push(batch.len());
            if self.fail_on_call == Some(self.batches.len()) {
                return Err(anyhow!("unique constraint violation"));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeCache {
        invalidations: AtomicUsize,
    }

    #[async_trait]
    impl StatsCache for FakeCache {
        async fn invalidate(&self) -> Result<()> {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    fn record(index: u32) -> Result<CameraRecord, RowError> {
        Ok(CameraRecord {
            camera_index: Some(index),
            system_type: Some("I. Hệ thống A".into()),
            ..Default::default()
        })
    }

    fn sheet(rows: Vec<Result<CameraRecord, RowError>>) -> ParsedSheet {
        ParsedSheet { rows, skipped: 0 }
    }

    fn opts(batch_size: usize) -> ImportOptions {
        ImportOptions {
            batch_size,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_five_records_batch_two_is_three_commits() {
        let mut store = FakeStore::default();
        let cache = FakeCache::default();
        let parsed = sheet((1..=5).map(record).collect());

        let report = run_import(&mut store, &cache, &parsed, &opts(2), "a.xlsx").await;

        assert_eq!(store.batches, vec![2, 2, 1]);
        assert_eq!(report.success, 5);
        assert_eq!(report.errors, 0);
        assert_eq!(report.status, crate::report::ImportStatus::Success);
    }

    #[tokio::test]
    async fn test_flush_failure_does_not_stop_later_batches() {
        let mut store = FakeStore {
            fail_on_call: Some(2),
            ..Default::default()
        };
        let cache = FakeCache::default();
        let parsed = sheet((1..=5).map(record).collect());

        let report = run_import(&mut store, &cache, &parsed, &opts(2), "a.xlsx").await;

        // Lô thứ 3 vẫn được thử sau khi lô 2 rollback
        assert_eq!(store.batches, vec![2, 2, 1]);
        assert_eq!(report.success, 3);
        assert_eq!(report.errors, 2);
        assert_eq!(report.details.len(), 1);
        assert_eq!(report.details[0].row, 4);
        assert!(report.details[0].info.contains("3-4"));
        assert!(report.details[0].error.starts_with("Database error:"));
    }

    #[tokio::test]
    async fn test_validation_error_rows_never_reach_store() {
        let mut store = FakeStore::default();
        let cache = FakeCache::default();

        let missing_system = CameraRecord {
            camera_index: Some(2),
            ..Default::default()
        };

        let parsed = sheet(vec![record(1), Ok(missing_system), record(3)]);
        let report = run_import(&mut store, &cache, &parsed, &opts(10), "a.xlsx").await;

        assert_eq!(report.success, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.details.len(), 1);
        assert_eq!(report.details[0].row, 2);
        assert_eq!(report.details[0].error, "Thiếu hệ thống camera");
        // Chỉ 2 bản ghi hợp lệ vào kho
        assert_eq!(store.batches.iter().sum::<usize>(), 2);
    }

    #[tokio::test]
    async fn test_parser_row_error_becomes_detail() {
        let mut store = FakeStore::default();
        let cache = FakeCache::default();

        let row_err = RowError {
            message: "Thiếu hoặc thứ tự camera không hợp lệ: ".into(),
            system_type: Some("II. Hệ thống B".into()),
        };
        let parsed = sheet(vec![record(1), Err(row_err)]);

        let report = run_import(&mut store, &cache, &parsed, &opts(10), "a.xlsx").await;

        assert_eq!(report.errors, 1);
        assert_eq!(report.details[0].row, 2);
        assert!(report.details[0].info.contains("II. Hệ thống B"));
    }

    #[tokio::test]
    async fn test_invalid_coordinate_names_raw_value_in_detail() {
        let mut store = FakeStore::default();
        let cache = FakeCache::default();

        let mut bad_coord = record(1).unwrap();
        bad_coord.latlon = Some("200.0,50.0".into());

        let parsed = sheet(vec![Ok(bad_coord)]);
        let report = run_import(&mut store, &cache, &parsed, &opts(10), "a.xlsx").await;

        assert_eq!(report.success, 0);
        assert_eq!(report.errors, 1);
        assert!(report.details[0].error.contains("200.0,50.0"));
        assert!(report.details[0].info.contains("Thứ tự: 1"));
    }

    #[tokio::test]
    async fn test_cache_invalidated_once_per_import() {
        let mut store = FakeStore::default();
        let cache = FakeCache::default();
        let parsed = sheet((1..=7).map(record).collect());

        run_import(&mut store, &cache, &parsed, &opts(3), "a.xlsx").await;

        assert_eq!(cache.invalidations.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_empty_parse_result_imports_nothing() {
        let mut store = FakeStore::default();
        let cache = FakeCache::default();
        let parsed = sheet(vec![]);

        let report = run_import(&mut store, &cache, &parsed, &opts(2), "a.xlsx").await;

        assert!(store.batches.is_empty());
        assert_eq!(report.success, 0);
        assert_eq!(report.status, crate::report::ImportStatus::Success);
    }

    #[test]
    fn test_context_info_format() {
        assert_eq!(
            context_info(Some("I. Hệ thống A"), Some(3)),
            " - Hệ thống: I. Hệ thống A, Thứ tự: 3"
        );
        assert_eq!(context_info(None, None), "");
    }

    #[test]
    fn test_batch_size_from_env_fallback() {
        // Không đặt biến môi trường trong test để tránh đụng test khác;
        // chỉ kiểm tra giá trị mặc định
        assert_eq!(ImportOptions::default().batch_size, DEFAULT_BATCH_SIZE);
    }
}

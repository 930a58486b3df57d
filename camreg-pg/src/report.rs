//! Báo cáo kết quả nhập với chi tiết lỗi theo dòng
//!
//! Mỗi file một báo cáo: đếm thành công/lỗi, danh sách lỗi theo thứ
//! tự dòng, và thống kê theo nhãn hệ thống.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Trạng thái chung của một đợt nhập.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImportStatus {
    /// Nhập trọn vẹn, không dòng lỗi
    Success,
    /// Có bản ghi vào kho nhưng kèm dòng lỗi
    PartialSuccess,
    /// Không bản ghi nào vào kho
    Failed,
}

/// Một mục lỗi: số dòng (1-based trên các bản ghi phát sinh từ
/// parser), thông điệp, và ngữ cảnh nhận dạng camera.
#[derive(Debug, Clone, Serialize)]
pub struct RowErrorDetail {
    pub row: usize,
    pub error: String,
    pub info: String,
}

/// Thống kê theo nhãn hệ thống.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SystemStats {
    /// Số bản ghi đã commit
    pub imported: usize,
    /// Số dòng lỗi
    pub errors: usize,
}

/// Báo cáo một đợt nhập. Bất biến sau khi [`finalize`](Self::finalize).
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// File nguồn
    pub file: String,
    /// Thời gian chạy (giây)
    pub duration_secs: f64,
    /// Trạng thái chung
    pub status: ImportStatus,

    /// Số bản ghi đã commit
    pub success: usize,
    /// Số dòng lỗi (kiểm tra + kho)
    pub errors: usize,
    /// Số dòng đệm parser đã bỏ qua (không phải lỗi)
    pub skipped_rows: usize,

    /// Thống kê theo nhãn hệ thống
    pub by_system: HashMap<String, SystemStats>,

    /// Chi tiết lỗi theo thứ tự dòng
    pub details: Vec<RowErrorDetail>,
}

impl ImportReport {
    /// Báo cáo rỗng cho một file.
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            duration_secs: 0.0,
            status: ImportStatus::Success,
            success: 0,
            errors: 0,
            skipped_rows: 0,
            by_system: HashMap::new(),
            details: Vec::new(),
        }
    }

    /// Báo cáo cho một file hỏng ở mức file (không đọc được dòng nào).
    pub fn file_failure(file: &str, message: &str) -> Self {
        let mut report = Self::new(file);
        report.status = ImportStatus::Failed;
        report.errors = 1;
        report.details.push(RowErrorDetail {
            row: 0,
            error: message.to_string(),
            info: String::new(),
        });
        report
    }

    /// Ghi nhận một bản ghi đã commit.
    pub fn record_imported(&mut self, system_type: &str) {
        self.success += 1;
        self.by_system
            .entry(system_type.to_string())
            .or_default()
            .imported += 1;
    }

    /// Ghi nhận một dòng lỗi (kiểm tra hoặc parse).
    pub fn record_row_error(
        &mut self,
        row: usize,
        error: String,
        info: String,
        system_type: Option<&str>,
    ) {
        self.errors += 1;
        if let Some(system) = system_type {
            self.by_system.entry(system.to_string()).or_default().errors += 1;
        }
        self.details.push(RowErrorDetail { row, error, info });
    }

    /// Ghi nhận một lô bị rollback khi commit.
    ///
    /// Một mục lỗi duy nhất gắn vào dòng kích hoạt flush, phần info
    /// nêu trọn dải dòng của lô; mọi dòng trong lô tính vào `errors`.
    pub fn record_flush_failure(
        &mut self,
        first_row: usize,
        last_row: usize,
        systems: &[String],
        error: String,
    ) {
        self.errors += systems.len();
        for system in systems {
            self.by_system.entry(system.clone()).or_default().errors += 1;
        }
        self.details.push(RowErrorDetail {
            row: last_row,
            error,
            info: format!(
                " - Lô dòng {first_row}-{last_row} đã rollback ({} bản ghi)",
                systems.len()
            ),
        });
    }

    /// Chốt trạng thái và thời gian chạy.
    pub fn finalize(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
        self.status = if self.errors == 0 {
            ImportStatus::Success
        } else if self.success > 0 {
            ImportStatus::PartialSuccess
        } else {
            ImportStatus::Failed
        };
    }

    /// In báo cáo ra console.
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("IMPORT REPORT - {}", self.file);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);
        println!(
            "Records: {} imported, {} errors, {} spacer rows skipped",
            self.success, self.errors, self.skipped_rows
        );

        if !self.by_system.is_empty() {
            println!("\n--- BY SYSTEM ---");
            let mut systems: Vec<_> = self.by_system.iter().collect();
            systems.sort_by_key(|(name, _)| name.as_str());
            for (name, stats) in systems {
                println!(
                    "  {}: {} imported, {} errors",
                    name, stats.imported, stats.errors
                );
            }
        }

        if !self.details.is_empty() {
            println!("\n--- ERRORS ({}) ---", self.details.len());
            for detail in self.details.iter().take(20) {
                println!("  [row {}] {}{}", detail.row, detail.error, detail.info);
            }
            if self.details.len() > 20 {
                println!("  ... and {} more", self.details.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Lưu báo cáo dạng JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Một dòng tóm tắt.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} imported, {} errors",
            self.file, self.success, self.errors
        )
    }
}

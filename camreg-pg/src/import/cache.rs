//! Làm tươi bộ đệm thống kê sau khi nhập
//!
//! Số liệu dashboard (đếm theo hệ thống, bản đồ màu) được cache theo
//! bộ sưu tập camera. Sau mỗi đợt nhập: xóa các dòng cache đã tính và
//! phát NOTIFY để tiến trình web đang chạy biết mà tính lại.

use anyhow::{Context, Result};
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tracing::debug;

use super::store::StatsCache;

/// Kênh NOTIFY báo cache thống kê đã đổi.
pub const STATS_CHANNEL: &str = "camreg_stats";

/// Hiện thực trên PostgreSQL: bảng `_stats_cache` + NOTIFY.
pub struct PgStatsCache {
    pool: Pool,
    schema: String,
}

impl PgStatsCache {
    pub fn new(pool: Pool, schema: &str) -> Self {
        Self {
            pool,
            schema: schema.to_string(),
        }
    }
}

#[async_trait]
impl StatsCache for PgStatsCache {
    async fn invalidate(&self) -> Result<()> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get connection from pool")?;

        let deleted = client
            .execute(&format!("DELETE FROM {}._stats_cache", self.schema), &[])
            .await
            .context("Failed to clear stats cache")?;

        client
            .batch_execute(&format!("NOTIFY {STATS_CHANNEL}"))
            .await
            .context("Failed to notify stats listeners")?;

        debug!(deleted, "Invalidated stats cache");
        Ok(())
    }
}

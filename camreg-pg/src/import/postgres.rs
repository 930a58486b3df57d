//! Schema PostgreSQL cho kho camera

use anyhow::{Context, Result};
use deadpool_postgres::Pool;
use tracing::info;

/// Các cột cần index cho tìm kiếm và group by của ứng dụng web.
const INDEXED_COLUMNS: &[&str] = &[
    "owner_name",
    "organization_name",
    "address_street",
    "ward",
    "province",
    "system_type",
    "latlon",
    "latitude",
    "longitude",
];

/// Tạo schema và các bảng; tùy chọn xóa schema cũ trước.
pub async fn create_schema(pool: &Pool, schema: &str, drop_existing: bool) -> Result<()> {
    let client = pool.get().await?;

    if drop_existing {
        client
            .execute(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"), &[])
            .await
            .context("Failed to drop schema")?;
    }

    client
        .execute(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"), &[])
        .await
        .context("Failed to create schema")?;

    let cameras = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {schema}.cameras (
            id BIGSERIAL PRIMARY KEY,

            owner_name TEXT,
            organization_name TEXT,
            address_street TEXT,
            ward TEXT,
            province TEXT,
            phone TEXT,

            camera_index INTEGER NOT NULL,
            system_type TEXT NOT NULL,

            monitoring_modes TEXT,
            storage_types TEXT,
            retention_days INTEGER,

            manufacturer TEXT,
            camera_types TEXT,
            form_factors TEXT,
            network_types TEXT,
            install_areas TEXT,

            latlon TEXT,
            latitude DOUBLE PRECISION,
            longitude DOUBLE PRECISION,

            login_user TEXT,
            login_password TEXT,
            login_domain TEXT,
            static_ip TEXT,
            ip_port TEXT,
            dvr_model TEXT,
            camera_model TEXT,

            resolution TEXT,
            bandwidth TEXT,
            serial_number TEXT,
            verification_code TEXT,
            category TEXT,
            sharing_scope BOOLEAN NOT NULL DEFAULT FALSE,

            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#
    );

    client
        .batch_execute(&cameras)
        .await
        .context("Failed to create cameras table")?;

    // Bảng cache thống kê: dashboard ghi, đợt nhập xóa
    let stats_cache = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {schema}._stats_cache (
            cache_key TEXT PRIMARY KEY,
            payload TEXT NOT NULL,
            computed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#
    );

    client
        .batch_execute(&stats_cache)
        .await
        .context("Failed to create _stats_cache table")?;

    info!(schema, "Schema ready");
    Ok(())
}

/// Tạo index sau khi nhập (nhanh hơn là duy trì index trong lúc ghi).
pub async fn create_indexes(pool: &Pool, schema: &str) -> Result<()> {
    let client = pool.get().await?;

    for column in INDEXED_COLUMNS {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS idx_cameras_{column} ON {schema}.cameras ({column})"
        );
        client
            .execute(&sql, &[])
            .await
            .with_context(|| format!("Failed to create index on {column}"))?;
    }

    info!(schema, indexes = INDEXED_COLUMNS.len(), "Indexes ready");
    Ok(())
}

/// Đếm số camera hiện có (dùng cho test tích hợp và tóm tắt).
pub async fn count_cameras(pool: &Pool, schema: &str) -> Result<i64> {
    let client = pool.get().await?;
    let row = client
        .query_one(&format!("SELECT COUNT(*) FROM {schema}.cameras"), &[])
        .await
        .context("Failed to count cameras")?;
    Ok(row.get(0))
}

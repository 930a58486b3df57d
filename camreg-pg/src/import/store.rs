//! Kho ghi camera: trait và hiện thực PostgreSQL
//!
//! Tầng điều phối chỉ biết trait; PostgreSQL là một hiện thực, test
//! đơn vị dùng kho giả trong bộ nhớ.

use anyhow::{Context, Result};
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::types::ToSql;
use tracing::debug;

use super::entity::StagedCamera;

/// Kho nhận từng lô bản ghi, mỗi lô một transaction.
///
/// Lô thất bại phải được rollback trọn vẹn trước khi trả lỗi; người
/// gọi sẽ tiếp tục với lô sau trên transaction mới.
#[async_trait]
pub trait CameraStore: Send {
    async fn insert_batch(&mut self, batch: &[StagedCamera]) -> Result<()>;
}

/// Bộ đệm thống kê phải làm tươi sau mỗi đợt nhập.
#[async_trait]
pub trait StatsCache: Send + Sync {
    async fn invalidate(&self) -> Result<()>;
}

/// Hiện thực kho trên PostgreSQL: INSERT có tham số trong transaction.
pub struct PgCameraStore {
    pool: Pool,
    schema: String,
}

impl PgCameraStore {
    pub fn new(pool: Pool, schema: &str) -> Self {
        Self {
            pool,
            schema: schema.to_string(),
        }
    }
}

const INSERT_COLUMNS: &str = "owner_name, organization_name, address_street, ward, province, \
     phone, camera_index, system_type, monitoring_modes, storage_types, retention_days, \
     manufacturer, camera_types, form_factors, network_types, install_areas, latlon, latitude, \
     longitude, login_user, login_password, login_domain, static_ip, ip_port, dvr_model, \
     camera_model, resolution, bandwidth, serial_number, verification_code, category, \
     sharing_scope";

const INSERT_PARAMS: usize = 32;

#[async_trait]
impl CameraStore for PgCameraStore {
    async fn insert_batch(&mut self, batch: &[StagedCamera]) -> Result<()> {
        let mut client = self
            .pool
            .get()
            .await
            .context("Failed to get connection from pool")?;

        // Transaction rollback tự động khi drop nếu lỗi giữa chừng
        let tx = client
            .transaction()
            .await
            .context("Failed to begin transaction")?;

        let placeholders = (1..=INSERT_PARAMS)
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {}.cameras ({INSERT_COLUMNS}) VALUES ({placeholders})",
            self.schema
        );
        let stmt = tx.prepare(&sql).await.context("Failed to prepare INSERT")?;

        for cam in batch {
            let params: [&(dyn ToSql + Sync); INSERT_PARAMS] = [
                &cam.owner_name,
                &cam.organization_name,
                &cam.address_street,
                &cam.ward,
                &cam.province,
                &cam.phone,
                &cam.camera_index,
                &cam.system_type,
                &cam.monitoring_modes,
                &cam.storage_types,
                &cam.retention_days,
                &cam.manufacturer,
                &cam.camera_types,
                &cam.form_factors,
                &cam.network_types,
                &cam.install_areas,
                &cam.latlon,
                &cam.latitude,
                &cam.longitude,
                &cam.login_user,
                &cam.login_password,
                &cam.login_domain,
                &cam.static_ip,
                &cam.ip_port,
                &cam.dvr_model,
                &cam.camera_model,
                &cam.resolution,
                &cam.bandwidth,
                &cam.serial_number,
                &cam.verification_code,
                &cam.category,
                &cam.sharing_scope,
            ];

            tx.execute(&stmt, &params).await.with_context(|| {
                format!(
                    "INSERT failed ({} / camera {})",
                    cam.system_type, cam.camera_index
                )
            })?;
        }

        tx.commit().await.context("Failed to commit batch")?;
        debug!(rows = batch.len(), "Committed camera batch");

        Ok(())
    }
}

//! Định nghĩa và hiện thực các lệnh CLI
//!
//! - `import`: bảng kê M2 → PostgreSQL, commit theo lô
//! - `check`: parse + kiểm tra không cần cơ sở dữ liệu (chạy khô)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use futures::stream::{self, StreamExt};
use rayon::prelude::*;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::import::cache::PgStatsCache;
use crate::import::store::PgCameraStore;
use crate::import::{self, pool, postgres, ImportOptions};
use crate::report::ImportReport;
use crate::validate::{self, validate_record};

/// Số đợt nhập chạy song song mặc định (mỗi file một đợt).
const DEFAULT_JOBS: usize = 2;

/// Các phần mở rộng được nhận là bảng kê M2.
const FORM_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv", "json"];

#[derive(Args)]
pub struct ImportArgs {
    /// Path to an M2 form (.xlsx/.xls/.csv/.json) or a directory of forms
    #[arg(short, long)]
    pub path: PathBuf,

    /// Records per transaction (default: env CAMREG_BATCH_SIZE or 100)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Target PostgreSQL schema
    #[arg(long, default_value = "camreg")]
    pub schema: String,

    /// Drop schema before import
    #[arg(long)]
    pub drop_schema: bool,

    /// Skip index creation at the end of the import
    #[arg(long)]
    pub skip_indexes: bool,

    /// Maximum number of forms imported concurrently
    #[arg(long, alias = "threads")]
    pub jobs: Option<usize>,

    /// Write the merged JSON report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// PostgreSQL host (default: env PGHOST / localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// PostgreSQL database name (default: env PGDATABASE / camreg)
    #[arg(long)]
    pub database: Option<String>,

    /// PostgreSQL user (default: env PGUSER / postgres)
    #[arg(long)]
    pub user: Option<String>,

    /// PostgreSQL password (default: env PGPASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// PostgreSQL port (default: env PGPORT / 5432)
    #[arg(long)]
    pub port: Option<u16>,

    /// SSL mode: disable, prefer, require (default: env PGSSLMODE / disable)
    #[arg(long)]
    pub ssl: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import M2 camera forms into PostgreSQL
    Import(ImportArgs),

    /// Validate M2 forms without a database (dry run)
    Check {
        /// Path to an M2 form or a directory of forms
        #[arg(short, long)]
        path: PathBuf,

        /// Write the merged JSON report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Thực hiện lệnh import.
pub async fn cmd_import(args: &ImportArgs) -> Result<()> {
    let forms = collect_forms(&args.path)?;
    if forms.is_empty() {
        anyhow::bail!("No M2 forms found in {}", args.path.display());
    }

    let batch_size = args
        .batch_size
        .filter(|n| *n > 0)
        .unwrap_or_else(ImportOptions::batch_size_from_env);
    let jobs = args.jobs.filter(|n| *n > 0).unwrap_or(DEFAULT_JOBS);
    let opts = ImportOptions {
        batch_size,
        ..Default::default()
    };

    let mut db_config = pool::DatabaseConfig::from_env();
    apply_database_overrides(&mut db_config, args);

    println!("=== Import ===");
    println!("Path: {}", args.path.display());
    println!("Forms: {}", forms.len());
    println!("Schema: {}", args.schema);
    println!("Batch size: {batch_size}");
    println!("Jobs: {jobs}");
    println!(
        "Database: {}@{}:{}/{} (SSL: {:?})",
        db_config.user, db_config.host, db_config.port, db_config.dbname, db_config.ssl_mode
    );

    let pg_pool = pool::create_pool(&db_config).await?;
    pool::test_connection(&pg_pool).await?;
    println!("Connected to PostgreSQL");

    postgres::create_schema(&pg_pool, &args.schema, args.drop_schema).await?;
    println!("Schema ready");

    // Mỗi file một đợt nhập độc lập; pool worker cỡ `jobs`
    let reports: Arc<Mutex<Vec<ImportReport>>> = Arc::new(Mutex::new(Vec::new()));
    let schema = Arc::new(args.schema.clone());

    stream::iter(forms.into_iter())
        .for_each_concurrent(jobs, |form_path| {
            let pg_pool = pg_pool.clone();
            let schema = Arc::clone(&schema);
            let reports = Arc::clone(&reports);
            let opts = opts;

            async move {
                let label = form_path.display().to_string();

                // Parse là CPU-bound, đẩy ra blocking thread
                let parsed = tokio::task::spawn_blocking({
                    let form_path = form_path.clone();
                    move || m2form::parse(&form_path)
                })
                .await;

                let report = match parsed {
                    Ok(Ok(parsed)) => {
                        let mut store = PgCameraStore::new(pg_pool.clone(), &schema);
                        let stats_cache = PgStatsCache::new(pg_pool, &schema);
                        import::run_import(&mut store, &stats_cache, &parsed, &opts, &label)
                            .await
                    }
                    Ok(Err(e)) => {
                        warn!(file = %label, error = %e, "Failed to parse form");
                        ImportReport::file_failure(&label, &e.to_string())
                    }
                    Err(e) => {
                        warn!(file = %label, error = %e, "Parse task failed");
                        ImportReport::file_failure(&label, &e.to_string())
                    }
                };

                reports.lock().await.push(report);
            }
        })
        .await;

    if !args.skip_indexes {
        postgres::create_indexes(&pg_pool, &args.schema).await?;
    }

    let reports = Arc::try_unwrap(reports)
        .map_err(|_| anyhow::anyhow!("Report collection still shared"))?
        .into_inner();

    finish(reports, args.report.as_deref())
}

/// Thực hiện lệnh check: parse + kiểm tra, không đụng cơ sở dữ liệu.
pub fn cmd_check(path: &Path, report_out: Option<&Path>) -> Result<()> {
    let forms = collect_forms(path)?;
    if forms.is_empty() {
        anyhow::bail!("No M2 forms found in {}", path.display());
    }

    println!("=== Check (dry run) ===");
    println!("Path: {}", path.display());
    println!("Forms: {}", forms.len());

    let reports: Vec<ImportReport> = forms.par_iter().map(|form| check_form(form)).collect();

    finish(reports, report_out)
}

/// Kiểm tra một file: đếm bản ghi nhập được và dòng lỗi, không ghi kho.
fn check_form(path: &Path) -> ImportReport {
    let started = std::time::Instant::now();
    let label = path.display().to_string();

    let parsed = match m2form::parse(path) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(file = %label, error = %e, "Failed to parse form");
            return ImportReport::file_failure(&label, &e.to_string());
        }
    };

    let mut report = ImportReport::new(&label);
    report.skipped_rows = parsed.skipped;

    for (idx, outcome) in parsed.rows.iter().enumerate() {
        let row_no = idx + 1;
        match outcome {
            Ok(record) => {
                match validate_record(record, crate::coord::normalize, validate::phone_ok) {
                    Ok(camera) => report.record_imported(&camera.system_type),
                    Err(e) => report.record_row_error(
                        row_no,
                        e.to_string(),
                        String::new(),
                        record.system_type.as_deref(),
                    ),
                }
            }
            Err(row_err) => report.record_row_error(
                row_no,
                row_err.message.clone(),
                String::new(),
                row_err.system_type.as_deref(),
            ),
        }
    }

    report.finalize(started.elapsed());
    report
}

/// In từng báo cáo, tóm tắt chung, và lưu JSON nếu yêu cầu.
fn finish(reports: Vec<ImportReport>, report_out: Option<&Path>) -> Result<()> {
    for report in &reports {
        report.display();
    }

    let total_success: usize = reports.iter().map(|r| r.success).sum();
    let total_errors: usize = reports.iter().map(|r| r.errors).sum();

    println!("\n=== Summary ===");
    for report in &reports {
        println!("- {}", report.summary());
    }
    println!("Total: {total_success} imported, {total_errors} errors");

    if let Some(out) = report_out {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(out, json)
            .with_context(|| format!("Failed to write report to {}", out.display()))?;
        println!("Report written to {}", out.display());
    }

    info!(
        files = reports.len(),
        success = total_success,
        errors = total_errors,
        "Run complete"
    );

    Ok(())
}

fn apply_database_overrides(config: &mut pool::DatabaseConfig, args: &ImportArgs) {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(database) = &args.database {
        config.dbname = database.clone();
    }
    if let Some(user) = &args.user {
        config.user = user.clone();
    }
    if let Some(password) = &args.password {
        config.password = Some(password.clone());
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(ssl) = &args.ssl {
        if let Ok(mode) = ssl.parse() {
            config.ssl_mode = mode;
        }
    }
}

/// Gom đệ quy các file bảng kê trong một thư mục (hoặc một file đơn).
fn collect_forms(path: &Path) -> Result<Vec<PathBuf>> {
    let mut forms = Vec::new();

    if path.is_file() {
        if has_form_extension(path) {
            forms.push(path.to_path_buf());
        }
        return Ok(forms);
    }

    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Cannot read directory {}", path.display()))?
    {
        let entry_path = entry?.path();
        if entry_path.is_dir() {
            forms.extend(collect_forms(&entry_path)?);
        } else if has_form_extension(&entry_path) {
            forms.push(entry_path);
        }
    }

    forms.sort();
    Ok(forms)
}

fn has_form_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| FORM_EXTENSIONS.contains(&ext.as_str()))
}

//! Điểm vào CLI cho camreg-pg

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use camreg_pg::cli::{self, Commands};

/// Nạp .env trước khi đọc cấu hình
fn load_env() {
    // Tìm .env ở thư mục hiện tại, không có thì thử cạnh binary
    if dotenvy::dotenv().is_err() {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Nhập bảng kê camera M2 vào PostgreSQL
#[derive(Parser)]
#[command(name = "camreg-pg")]
#[command(author, version)]
#[command(about = "Import M2 camera-inventory forms into PostgreSQL")]
struct Cli {
    /// Tăng mức log (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Chỉ in cảnh báo
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Import(args) => {
            info!(path = %args.path.display(), schema = %args.schema, "Import to PostgreSQL");
            cli::cmd_import(&args).await?;
        }
        Commands::Check { path, report } => {
            info!(path = %path.display(), "Dry-run check");
            cli::cmd_check(&path, report.as_deref())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}

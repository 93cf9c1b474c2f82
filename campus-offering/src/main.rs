//! campus-offering - course offering service
//!
//! Opens (or creates) the campus database under the resolved root folder and
//! serves the offered-course workflows over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use campus_common::config::{database_path, resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};
use campus_common::db::init_database;
use campus_offering::repository::{SqliteCatalog, SqliteOfferedCourses};
use campus_offering::{build_router, AppState, OfferedCourseService, DEFAULT_REQUEST_TIMEOUT};

const DEFAULT_PORT: u16 = 5830;
const DEFAULT_BIND: &str = "127.0.0.1";

/// Command-line arguments for campus-offering
#[derive(Parser, Debug)]
#[command(name = "campus-offering")]
#[command(about = "Course offering service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CAMPUS_OFFERING_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long)]
    bind: Option<String>,

    /// Root folder holding campus.db (overrides CAMPUS_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (defaults to the platform config location)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    let log_level = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("campus_offering={0},campus_common={0},tower_http={0}", log_level).into()
            }),
        )
        .init();

    info!("Starting campus-offering v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &config);
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let service = OfferedCourseService::new(
        Arc::new(SqliteCatalog::new(pool.clone())),
        Arc::new(SqliteOfferedCourses::new(pool.clone())),
    );
    let request_timeout = config
        .request_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
    let app = build_router(AppState::new(service), request_timeout);

    let bind = args
        .bind
        .or(config.bind)
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let port = args.port.or(config.port).unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("campus-offering listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

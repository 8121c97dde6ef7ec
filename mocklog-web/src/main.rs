//! mocklog-web - Mock test log server
//!
//! Records per-question outcomes of practice tests, imports them from
//! CSV/XLSX files, exports them as CSV and serves per-chapter statistics.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use mocklog_common::config::{
    config_file_path, CompiledDefaults, ConfigOrigin, RootFolderInitializer, RootFolderResolver,
    TomlConfig,
};
use mocklog_common::db::init::init_database;
use mocklog_common::ColumnAliasTable;
use mocklog_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const MODULE_NAME: &str = "mocklog-web";

/// Command-line arguments for mocklog-web
#[derive(Parser, Debug)]
#[command(name = "mocklog-web")]
#[command(about = "Mock test log: entry, import, export and chapter statistics")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "MOCKLOG_PORT")]
    port: Option<u16>,

    /// Folder holding mocklog.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file (default: <config dir>/mocklog/mocklog-web.toml)
    #[arg(short, long, env = "MOCKLOG_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let defaults = CompiledDefaults::for_current_platform();

    // Config is read before tracing so its [logging] section applies; the
    // outcome is logged once the subscriber exists.
    let config_path = args.config.clone().or_else(|| config_file_path(MODULE_NAME));
    let (config, origin) = TomlConfig::load_or_default(config_path.as_deref());

    init_tracing(&config, &defaults)?;

    info!(
        "Starting mocklog-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match origin {
        ConfigOrigin::File(path) => info!("Loaded config from {}", path.display()),
        ConfigOrigin::Missing => info!("No config file found, using defaults"),
        ConfigOrigin::Broken(e) => warn!("{}; using defaults", e),
    }

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder.clone())
        .with_toml_config(&config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    let existed = initializer.database_exists();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            if existed {
                info!("✓ Opened existing database");
            } else {
                info!("✓ Created new database");
            }
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let chapters = config
        .chapter_table()
        .context("Invalid [[chapters]] table in config")?;
    info!("Chapter taxonomy: {} chapters", chapters.len());

    let max_upload_bytes = config.max_upload_bytes.unwrap_or(defaults.max_upload_bytes);
    let state = AppState::new(pool, chapters, ColumnAliasTable::builtin(), max_upload_bytes);
    let app = build_router(state);

    let port = args.port.or(config.port).unwrap_or(defaults.port);
    let bind_address = config
        .bind_address
        .clone()
        .unwrap_or_else(|| defaults.bind_address.clone());
    let addr = format!("{}:{}", bind_address, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mocklog-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Install the fmt subscriber, honoring RUST_LOG over the configured level
fn init_tracing(config: &TomlConfig, defaults: &CompiledDefaults) -> Result<()> {
    let level = if config.logging.level.trim().is_empty() {
        defaults.log_level.as_str()
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", level)));

    match config.logging.file.as_ref().or(defaults.log_file.as_ref()) {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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

//! csvmig-api - CSV migration service
//!
//! Batch-loads departments, jobs, and hired employees into a single-file
//! SQLite store and serves two fixed analytical queries.

use anyhow::Result;
use clap::Parser;
use csvmig_api::{build_router, AppState};
use csvmig_common::config;
use csvmig_common::db::init_database;
use std::net::SocketAddr;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "csvmig-api", about = "CSV to SQL migration service")]
struct Args {
    /// Root folder holding the SQLite store (overrides env and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// HTTP listen port
    #[arg(long, env = "CSVMIG_PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting csvmig-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref());
    config::ensure_root_folder(&root_folder)?;

    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    // Creates the store and its tables on first run; no-op on an existing one
    let pool = init_database(&db_path).await?;

    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("csvmig-api listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

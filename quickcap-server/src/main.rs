use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use quickcap_server::{AppState, build_router, db};

const DEFAULT_PORT: u16 = 3000;

#[derive(Parser)]
#[command(name = "quickcap-server")]
#[command(about = "REST service for quickcap tasks and events", long_about = None)]
#[command(version)]
struct Args {
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// SQLite URL, e.g. sqlite://items.db?mode=rwc
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Shared secret required in x-api-key. Unset means open access.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

fn default_database_url() -> Result<String> {
    let dir: PathBuf = dirs::data_dir()
        .context("Could not determine data directory")?
        .join("quickcap");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Could not create {}", dir.display()))?;
    Ok(format!("sqlite://{}?mode=rwc", dir.join("server.db").display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quickcap_server=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let database_url = match args.database_url {
        Some(url) => url,
        None => default_database_url()?,
    };
    let pool = db::connect(&database_url).await?;

    if args.api_key.as_deref().is_none_or(str::is_empty) {
        tracing::warn!("API_KEY not set, API is open to anyone who can reach it");
    }
    let state = AppState::new(pool, args.api_key);

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("quickcap-server listening on http://{}", addr);
    tracing::info!("Health check available at http://{}/health", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

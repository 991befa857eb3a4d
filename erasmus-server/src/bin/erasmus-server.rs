/// Erasmus budget short-link server
///
/// Serves the create/resolve API and the `/s/:id` redirect page on top of a
/// JSON url table.

use clap::Parser;
use erasmus_server::{create_app, metrics, AppState, ServerConfig};
use erasmus_store::{StoreConfig, UrlStore};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "erasmus-server")]
#[command(about = "Erasmus budget short-link server", long_about = None)]
struct Args {
    /// Path to the JSON url table
    #[arg(short, long, value_name = "PATH", env = "URL_DB_FILE", default_value = "data/url-store.json")]
    db_path: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "ERASMUS_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Public base URL used in generated links
    #[arg(long, env = "PUBLIC_BASE_URL")]
    base_url: Option<String>,

    /// Domains whose Host header may be used to build links (comma separated)
    #[arg(long = "allowed-domain", env = "ALLOWED_DOMAINS", value_delimiter = ',')]
    allowed_domains: Vec<String>,

    /// Length of generated short ids
    #[arg(long, default_value = "6")]
    id_length: usize,

    /// Retention window in days for --cleanup-on-start
    #[arg(long, default_value = "90")]
    retention_days: u32,

    /// Remove expired links before serving
    #[arg(long)]
    cleanup_on_start: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to info level, can override with RUST_LOG env var
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    metrics::register_metrics();
    info!("Initialized Prometheus metrics");

    let args = Args::parse();

    let listen_addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let mut config = ServerConfig::new(listen_addr);
    if let Some(url) = args.base_url.filter(|u| !u.is_empty()) {
        config = config.with_public_base_url(url);
    }
    for domain in args.allowed_domains.into_iter().filter(|d| !d.is_empty()) {
        config = config.with_allowed_domain(domain);
    }
    config.validate().map_err(anyhow::Error::msg)?;

    let store_config = StoreConfig::new(&args.db_path)
        .with_id_length(args.id_length)
        .with_retention_days(args.retention_days);
    info!("Opening url table at {:?}", args.db_path);
    let store = UrlStore::open(store_config)?;

    if args.cleanup_on_start {
        let removed = store.cleanup_expired();
        info!("Startup cleanup removed {} links", removed);
    }
    metrics::STORED_RECORDS.set(store.stats().record_count as i64);

    let app = create_app(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("Server listening on http://{}", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shrinkray::cache::HttpFetcher;
use shrinkray::config::Paths;
use shrinkray::server::{AppState, router};

#[derive(Parser)]
#[command(name = "shrinkray")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Caching HTTP image minification proxy")]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Directory under which the cache lives; defaults to $HOME.
    #[arg(long)]
    home: Option<PathBuf>,

    /// Timeout for a single image fetch, in seconds.
    #[arg(long, default_value = "30")]
    fetch_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let home = match cli.home {
        Some(home) => home,
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .context("HOME is not set; pass --home")?,
    };

    let paths = Paths::new(&home);
    paths
        .ensure_directories()
        .with_context(|| format!("creating cache directories under {}", paths.cache_root.display()))?;

    let fetcher = HttpFetcher::new(Duration::from_secs(cli.fetch_timeout))
        .context("building HTTP client")?;
    let state = Arc::new(AppState::new(paths, Arc::new(fetcher)));

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("binding {}", cli.listen))?;
    info!(listen = %cli.listen, "shrinkray listening");

    axum::serve(listener, router(state))
        .await
        .context("serving HTTP")?;
    Ok(())
}

use anyhow::Result;
use axum::Router;
use clap::Parser;
use console_server::{build_app, config};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "console-server", about = "Serve the entity resolution console and proxy the search engine")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Host to bind (overrides server.host)
    #[arg(long)]
    host: Option<String>,
    /// Port to bind (overrides server.port)
    #[arg(long)]
    port: Option<u16>,
    /// Configuration override, e.g. -E search_engine.url=http://localhost:9200
    #[arg(short = 'E', value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let mut config = config::load(args.config.as_deref())?;
    for raw in &args.overrides {
        config.apply_override(raw)?;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let app: Router = build_app(&config)?;

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, upstream = %config.search_engine.url, "console listening");
    axum::serve(listener, app).await?;
    Ok(())
}

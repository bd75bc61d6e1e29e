//! dxf-geojson HTTP server
//!
//! Usage:
//!   dxf-geojson-server [OPTIONS]
//!
//! Settings come from `DXF_GEOJSON_*` environment variables, then the
//! optional TOML file given with `--config`, then the flags below.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dxf_geojson::server::{cancel_on_ctrl_c, ApiServer};
use dxf_geojson::ServiceConfig;

/// DXF to GeoJSON conversion service
#[derive(Parser)]
#[command(name = "dxf-geojson-server", version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server bind address
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,

    /// HTTP port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Largest accepted decoded drawing, in bytes
    #[arg(long, value_name = "BYTES")]
    max_payload_bytes: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn load_config(args: &Args) -> anyhow::Result<ServiceConfig> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    if let Some(bind) = &args.bind {
        config.host = bind.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(max) = args.max_payload_bytes {
        config.max_payload_bytes = max;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!(version = dxf_geojson::VERSION, "starting dxf-geojson server");

    let server = ApiServer::new(config);
    tokio::spawn(cancel_on_ctrl_c(server.shutdown_token()));
    server.run().await.context("server failed")?;

    info!("server stopped");
    Ok(())
}

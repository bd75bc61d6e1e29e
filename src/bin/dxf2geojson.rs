//! Convert a DXF file to GeoJSON on stdout
//!
//! Usage:
//!   dxf2geojson [OPTIONS] <FILE>

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dxf_geojson::convert::{convert_path, ConvertOptions};

#[derive(Parser)]
#[command(name = "dxf2geojson", version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Drawing to convert
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Spatial reference of the drawing, e.g. EPSG:31982
    #[arg(short, long, value_name = "CRS")]
    source_crs: Option<String>,

    /// Spatial reference of the output
    #[arg(short, long, value_name = "CRS", default_value = "EPSG:4326")]
    target_crs: String,

    /// Keep drawing coordinates and omit the CRS annotation
    #[arg(short, long)]
    keep_original_coords: bool,

    /// Only emit the layer and text properties
    #[arg(long)]
    no_fields: bool,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = ConvertOptions {
        source_crs: args.source_crs.clone(),
        target_crs: Some(args.target_crs.clone()),
        keep_original_coords: args.keep_original_coords,
        include_fields: !args.no_fields,
    };
    let collection = convert_path(&args.input, &options)
        .with_context(|| format!("converting {}", args.input.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &collection)?;
    } else {
        serde_json::to_writer(&mut out, &collection)?;
    }
    writeln!(out)?;
    Ok(())
}

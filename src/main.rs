use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod predict;

/// Reduce raw model detections to the list of products in each image
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Detection files, each a JSON array of detections for one image
    #[arg(required = true)]
    detections: Vec<PathBuf>,

    /// Class names: `.json` array/object or `id: name` lines
    #[arg(long)]
    names: PathBuf,

    /// JSON pipeline config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overlap above which same-class boxes are duplicates, in (0, 1]
    #[arg(long)]
    iou_threshold: Option<f64>,

    /// Drop detections scoring below this before suppression
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Report each product once
    #[arg(long)]
    unique: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine readable (RUST_LOG=info by default)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let overrides = predict::Overrides {
        iou_threshold: args.iou_threshold,
        min_confidence: args.min_confidence,
        unique_labels: args.unique,
    };
    let config = predict::build_config(args.config.as_deref(), &overrides)?;

    let output = predict::run(&config, &args.names, &args.detections)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);

    Ok(())
}

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use color_reduce_wasm::{InitPolicy, QuantizeConfig, reduce_colors_bytes};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Init {
    FarthestPoint,
    FirstDistinct,
}

impl From<Init> for InitPolicy {
    fn from(init: Init) -> Self {
        match init {
            Init::FarthestPoint => InitPolicy::FarthestPoint,
            Init::FirstDistinct => InitPolicy::FirstDistinct,
        }
    }
}

/// Reduce images to white, black, red, green and blue.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of k-means clusters (1-5)
    #[arg(short = 'k', long, default_value_t = 5)]
    clusters: usize,

    /// Iteration cap for the clustering loop
    #[arg(short = 'i', long, default_value_t = 500)]
    max_iterations: usize,

    /// Centroid seeding policy
    #[arg(long, value_enum, default_value_t = Init::FarthestPoint)]
    init: Init,

    /// Stop clustering after this many milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "reduced_")]
    prefix: String,

    /// Print a JSON report per image on stdout
    #[arg(long)]
    json: bool,

    /// Log filter directive, e.g. `debug` or `color_reduce_wasm=trace`
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| "color_reduce_wasm=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let mut config = QuantizeConfig::new()
        .clusters(args.clusters)
        .max_iterations(args.max_iterations)
        .init(args.init.into());
    if let Some(ms) = args.deadline_ms {
        config = config.deadline(Duration::from_millis(ms));
    }

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let (png, reduction) =
            reduce_colors_bytes(&bytes, &config).context("color reduction failed")?;

        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        let out_path = if let Some(dir) = &args.out_dir {
            dir.join(format!("{stem}.png"))
        } else {
            PathBuf::from(format!("{}{}.png", args.prefix, stem))
        };

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, png)?;
        tracing::info!(input = %input.display(), output = %out_path.display(), "saved");

        if args.json {
            let clustering = &reduction.clustering;
            let clusters: Vec<_> = clustering
                .centroids
                .iter()
                .zip(clustering.cluster_sizes())
                .zip(reduction.table.as_slice())
                .map(|((centroid, size), color)| {
                    serde_json::json!({
                        "centroid": centroid,
                        "pixels": size,
                        "color": color.name(),
                    })
                })
                .collect();
            let report = serde_json::json!({
                "input": input.display().to_string(),
                "output": out_path.display().to_string(),
                "iterations": clustering.iterations,
                "termination": clustering.termination.as_str(),
                "clusters": clusters,
            });
            println!("{report}");
        } else {
            println!("Saved → {}", out_path.display());
        }
    }

    Ok(())
}

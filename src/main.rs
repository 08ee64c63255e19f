use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn, Level};

use strip_compositor::{
    analysis::AnalysisDocument,
    composition::{CompositionRequest, Compositor},
    config::Config,
    sink::KeyframeStore,
    strip::load_manifest,
    CompositorError,
};

#[derive(Parser)]
#[command(
    name = "strip-compositor",
    version,
    about = "Lay out media strips and animate them in sync with music",
    long_about = "Strip-Compositor places media strips on a canvas and writes beat-synchronized keyframe animations, driven by a TOML configuration and a precomputed audio analysis."
)]
struct Cli {
    /// Configuration file (optional, defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Audio analysis document (JSON)
    #[arg(short, long)]
    analysis: PathBuf,

    /// Strip manifest (JSON array, in strip order)
    #[arg(short, long)]
    strips: PathBuf,

    /// Write all keyframes to this JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the project seed
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn friendly(e: CompositorError) -> anyhow::Error {
    anyhow::anyhow!(e.user_message())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Starting Strip-Compositor v{}", env!("CARGO_PKG_VERSION"));
    info!("Analysis: {:?}", cli.analysis);
    info!("Strips: {:?}", cli.strips);

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path).map_err(friendly)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    if let Some(seed) = cli.seed {
        info!("Seed override: {}", seed);
        config.project.seed = Some(seed);
    }

    let validated = config.validate().map_err(friendly)?;
    let strips = load_manifest(&cli.strips).map_err(friendly)?;
    let analysis = AnalysisDocument::from_file(&cli.analysis).map_err(friendly)?;

    info!("Loaded {} strips", strips.len());

    let request = CompositionRequest::from_config(&validated, strips, analysis);
    let mut store = KeyframeStore::with_strips(request.strips.iter().map(|strip| strip.id.clone()));

    let result = Compositor::new().compose(&request, &mut store);

    for issue in &result.issues {
        warn!("{} on '{}': {}", issue.animation, issue.strip, issue.reason);
    }

    if !result.success {
        bail!(
            "Composition failed: {}",
            result.fatal.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    for (strip, count) in &result.keyframes {
        info!("   {}: {} keyframes", strip, count);
    }

    if let Some(output) = &cli.output {
        store.save_json(output).map_err(friendly)?;
        info!("Keyframes saved to: {:?}", output);
    }

    info!(
        "Composition complete: {} keyframes across {} strips",
        result.total_keyframes(),
        result.keyframes.len()
    );
    Ok(())
}

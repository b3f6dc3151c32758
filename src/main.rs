use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ascii_raycaster::{config::Config, session::Session, term, window};

/// First-person ASCII raycaster.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map file (rows of glyphs); overrides the config's map.
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Print one frame to stdout and exit.
    #[arg(long, conflicts_with = "window")]
    once: bool,

    /// Open a window instead of drawing in the terminal.
    #[arg(long)]
    window: bool,
}

fn main() -> Result<()> {
    // stdout is the render sink; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(map) = cli.map {
        config.map.file = Some(map);
    }

    let session = Session::from_config(&config).context("setting up session")?;

    if cli.once {
        for row in session.frame().rows() {
            println!("{row}");
        }
        return Ok(());
    }

    if cli.window {
        window::run(session)
    } else {
        term::run(session)
    }
}

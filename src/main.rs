//!
//! src/main.rs
//!
//! CLI entry point: argument parsing, logging setup, and the final
//! summary of written files
//!
//!

mod album;
mod config;
mod errors;
mod extract;
mod logging;
mod pipeline;
mod prompt;
mod runner;
mod tools;
mod types;

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::errors::AlbumizerError;
use crate::pipeline::{Pipeline, RunOptions};
use crate::prompt::{AcceptDefaults, InteractivePrompt, Prompt};
use crate::runner::TokioRunner;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Download a media source and split it into tagged per-track files"
)]
struct Cli {
    /// Source URL
    url: Option<String>,

    /// Show external tool output and debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Output to directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Show the plan but don't download media
    #[arg(short = 'n', long)]
    skip_download: bool,

    /// Accept all derived defaults without prompting
    #[arg(short = 'y', long)]
    yes: bool,

    /// Legacy mode: split without embedding tags
    #[arg(long)]
    no_tags: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AlbumizerError> {
    let cli = Cli::parse();

    let cfgs = config::load_config()?;
    let _logger = logging::init_logging(&cfgs.logging, cli.verbose)?;

    tracing::info!(version = %env!("CARGO_PKG_VERSION"), "starting");

    let raw_url = cli
        .url
        .ok_or_else(|| AlbumizerError::Config("requires a URL".to_string()))?;
    let url = Url::parse(&raw_url)
        .map_err(|e| AlbumizerError::Config(format!("invalid URL '{raw_url}': {e}")))?;

    let prompt: Box<dyn Prompt> = if cli.yes {
        Box::new(AcceptDefaults)
    } else {
        Box::new(InteractivePrompt)
    };
    let runner = TokioRunner::new(cfgs.tools.timeout);

    let opts = RunOptions {
        output_dir: cli.output,
        verbose: cli.verbose,
        skip_download: cli.skip_download,
        embed_tags: !cli.no_tags,
    };
    let pipeline = Pipeline::new(&cfgs, &runner, prompt.as_ref(), opts);
    let results = pipeline.run(&url).await?;

    println!("-- Summary --");
    for path in &results {
        println!("{}", path.display());
    }

    Ok(())
}

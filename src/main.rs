use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use partstore::{Shell, Store, StoreConfig};

#[derive(Parser)]
#[command(name = "partstore", version, about = "Chunked object storage shell")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StoreConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    let store = Arc::new(Store::open(config).context("Failed to open store")?);

    let mut shell = Shell::new(store, io::stdout());
    shell
        .run(io::stdin().lock())
        .context("Failed to read commands")?;
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use units_cli::{UnitsCli, run};

pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = UnitsCli::parse();
    run(&cli, &mut std::io::stdout().lock())
}

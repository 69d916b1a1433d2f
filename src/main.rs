//! CLI entry point for procedural decoy image synthesis

use clap::Parser;
use poisonpix::io::cli::{BatchRunner, Cli};

fn main() -> poisonpix::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut runner = BatchRunner::new(cli);
    runner.process()?;
    Ok(())
}

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{groups, run};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match &cli.command {
        Commands::Run(args) => run::run(&cli, args),
        Commands::Groups(args) => groups::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }

use std::path::PathBuf;

use osm_features::Family;

/// OpenStreetMap feature extraction for buffer zones
#[derive(clap::Parser, Debug)]
#[command(name = "osm-features", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Extract feature tables and write one CSV per family
    Run(RunArgs),

    /// Print the per-group feature breakdown of a family
    Groups(GroupsArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// JSON configuration file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Families to run, defaults to all (pois, traffic, transport, buildings, roads)
    #[arg(short, long = "family", value_parser = parse_family)]
    pub families: Vec<Family>,
}

#[derive(clap::Args, Debug)]
pub struct GroupsArgs {
    /// JSON configuration file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Family to summarize
    #[arg(short, long, value_parser = parse_family)]
    pub family: Family,
}

fn parse_family(s: &str) -> Result<Family, String> {
    s.parse().map_err(|e: osm_features::FeatureError| e.to_string())
}

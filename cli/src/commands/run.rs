use anyhow::Result;
use osm_features::{Config, Pipeline};
use tracing::info;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::RunArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let pipeline = Pipeline::new(config)?;

    let written = pipeline.run(&args.families)?;
    info!(tables = written.len(), "[run] done");
    Ok(())
}

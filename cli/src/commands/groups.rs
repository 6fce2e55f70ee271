use anyhow::Result;
use osm_features::{Config, Pipeline};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::GroupsArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let pipeline = Pipeline::new(config)?;
    let summary = pipeline.summarize(args.family)?;

    let total: usize = summary.groups.values().sum();
    println!("{} features in {} groups ({})", total, summary.groups.len(), summary.family);
    for (group, count) in &summary.groups {
        println!("  {group:<24} {count:>10}");
    }
    if !summary.unmapped.is_empty() {
        println!("unmapped raw types: {}", summary.unmapped.join(", "));
    }
    Ok(())
}

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::{
    classify::Group,
    config::Config,
    extract::{ExtractOptions, Extractor},
    family::Family,
    geom::Projector,
    io,
    store::{Buffers, FeatureSet},
    table::FeatureTable,
};

/// Group breakdown of one family: features per group, before any threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub family: Family,
    pub groups: BTreeMap<Group, usize>,
    /// Distinct raw types that the crosswalk does not map.
    pub unmapped: Vec<String>,
}

/// Loads the buffers once and runs families against them.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
    options: ExtractOptions,
    projector: Projector,
    buffers: Buffers,
}

impl Pipeline {
    /// Build the projector and load the buffers named by `config`.
    pub fn new(config: Config) -> Result<Self> {
        let projector = Projector::new(&config.projected_crs)
            .context("[pipeline] Failed to build projector")?;

        let path = config.buffers_path();
        let records = io::geojson::read_buffers(&path, &config.buffers.id_field)?;
        let buffers = Buffers::new(records, &projector)
            .with_context(|| format!("[pipeline] Invalid buffers in {}", path.display()))?;
        info!(buffers = buffers.len(), path = %path.display(), crs = projector.definition(), "loaded buffers");

        Ok(Self { options: config.extract_options(), config, projector, buffers })
    }

    #[inline] pub fn config(&self) -> &Config { &self.config }

    #[inline] pub fn buffers(&self) -> &Buffers { &self.buffers }

    /// Read and classify every feature of `family`.
    pub fn load_family(&self, family: Family) -> Result<FeatureSet> {
        let crosswalk_path = self.config.crosswalk_path(family);
        let crosswalk = io::csv::read_crosswalk(&crosswalk_path)?;
        debug!(%family, path = %crosswalk_path.display(), types = crosswalk.len(), groups = ?crosswalk.groups(), "loaded crosswalk");

        let mut raw = Vec::new();
        for path in self.config.shapefiles(family) {
            let features = io::shp::read_features(&path, family)?;
            debug!(%family, path = %path.display(), features = features.len(), "read layer");
            raw.extend(features);
        }

        let features = FeatureSet::classify(family, raw, &crosswalk);
        let counts = features.group_counts();
        info!(%family, features = features.len(), groups = counts.len(), "classified");
        let breakdown: Vec<String> = counts.iter().map(|(group, n)| format!("{group}={n}")).collect();
        debug!(%family, breakdown = %breakdown.join(", "), "group breakdown");
        Ok(features)
    }

    /// Build the table of one family without writing it.
    pub fn extract(&self, family: Family) -> Result<FeatureTable> {
        let features = self.load_family(family)?;
        Extractor::new(&self.buffers, &self.projector, &self.options)
            .extract(features)
            .with_context(|| format!("[pipeline] Failed to extract {family} features"))
    }

    /// Extract one family and write it to its output path.
    pub fn run_family(&self, family: Family) -> Result<PathBuf> {
        let table = self.extract(family)?;
        let path = self.config.output_path(family);
        io::csv::write_table(&table, &path)?;
        info!(%family, id = table.id_field(), columns = table.columns().len() + 1, rows = table.height(), path = %path.display(), "wrote table");
        Ok(path)
    }

    /// Run the given families in order. An empty selection runs all of them.
    pub fn run(&self, families: &[Family]) -> Result<Vec<PathBuf>> {
        let families = if families.is_empty() { Family::order().to_vec() } else { families.to_vec() };
        families.into_iter().map(|family| self.run_family(family)).collect()
    }

    /// Count features per group, and list raw types without a crosswalk entry.
    pub fn summarize(&self, family: Family) -> Result<GroupSummary> {
        let features = self.load_family(family)?;

        let mut unmapped: Vec<String> = features.features().iter()
            .filter(|feature| feature.group == Group::unclassified())
            .filter_map(|feature| feature.raw_type.clone())
            .collect();
        unmapped.sort();
        unmapped.dedup();

        Ok(GroupSummary { family, groups: features.group_counts(), unmapped })
    }
}

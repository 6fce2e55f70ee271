use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    aggregate::{AreaStats, CountStats, LengthStats},
    classify::Group,
    error::{FeatureError, Result},
    family::{Family, FamilyKind},
    geom::{DistanceUnit, Projector},
    join::{JoinPair, SpatialIndex},
    nearest::{NearestStats, VertexIndex},
    store::{Buffers, ClassifiedFeature, FeatureSet},
    table::{FeatureTable, GroupColumns},
};

/// What happens to road groups at or below `min_road_features`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Drop their features from the per-group and the `all_roads_*` columns.
    #[default]
    Exclude,
    /// Relabel their features "other"; "other" is then kept whenever it is non-empty.
    MergeIntoOther,
}

/// Parameters of the extraction that do not depend on the input files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Name of the buffer id column in output tables.
    pub id_field: String,
    /// A road group is kept when it has strictly more features than this.
    pub min_road_features: usize,
    pub below_threshold: ThresholdPolicy,
    pub distance_unit: DistanceUnit,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            id_field: "geom_id".into(),
            min_road_features: 0,
            below_threshold: ThresholdPolicy::Exclude,
            distance_unit: DistanceUnit::Meters,
        }
    }
}

/// Turns classified feature sets into per-buffer tables.
#[derive(Debug)]
pub struct Extractor<'a> {
    buffers: &'a Buffers,
    projector: &'a Projector,
    options: &'a ExtractOptions,
}

impl<'a> Extractor<'a> {
    pub fn new(buffers: &'a Buffers, projector: &'a Projector, options: &'a ExtractOptions) -> Self {
        Self { buffers, projector, options }
    }

    /// Build the table of one family. Groups are computed in parallel.
    pub fn extract(&self, mut features: FeatureSet) -> Result<FeatureTable> {
        let family = features.family();
        if features.is_empty() {
            warn!(%family, "no features; every buffer is zero-filled");
        }
        info!(%family, features = features.len(), buffers = self.buffers.len(), "extracting");

        let groups = self.select_groups(&mut features);
        features.measure(self.projector)?;
        debug!(%family, groups = ?groups.iter().map(Group::as_str).collect::<Vec<_>>(), "selected groups");

        match family.kind() {
            FamilyKind::Count => self.counts(&features, &groups),
            FamilyKind::Area => self.areas(&features, &groups),
            FamilyKind::Network => self.network(&features, &groups),
        }
    }

    /// Groups that get their own columns, after dropping the features of all other groups.
    ///
    /// Count families keep every group. Area families drop "other" and "unclassified".
    /// Network families apply the minimum-occurrence threshold.
    pub fn select_groups(&self, features: &mut FeatureSet) -> Vec<Group> {
        match features.family().kind() {
            FamilyKind::Count => {}
            FamilyKind::Area => features.retain_groups(|group| !group.is_fallback()),
            FamilyKind::Network => {
                let min = self.options.min_road_features;
                let counts = features.group_counts();
                let below = |group: &Group| counts.get(group).is_some_and(|&n| n <= min);

                match self.options.below_threshold {
                    ThresholdPolicy::Exclude => features.retain_groups(|group| !below(group)),
                    ThresholdPolicy::MergeIntoOther => features.relabel(below, &Group::other()),
                }
            }
        }
        features.groups()
    }

    fn counts(&self, features: &FeatureSet, groups: &[Group]) -> Result<FeatureTable> {
        let family = features.family();
        let buffers = self.buffers;
        let n = buffers.len();

        let mut stats = groups.par_iter()
            .map(|group| -> Result<(Group, CountStats)> {
                let subset = features.of_group(group);
                let pairs = join(family, &subset, buffers)?;
                debug!(%family, %group, features = subset.len(), matches = pairs.len(), "joined");
                Ok((group.clone(), CountStats::from_pairs(&pairs, n)))
            })
            .collect::<Result<Vec<_>>>()?;
        stats.sort_by(|a, b| a.0.cmp(&b.0));

        let columns = stats.iter().map(|(group, s)| s.columns(group, family)).collect();
        let totals = CountStats::totals(family, stats.iter().map(|(_, s)| s), n);

        FeatureTable::assemble(family, &self.options.id_field, buffers, columns, totals)
    }

    fn areas(&self, features: &FeatureSet, groups: &[Group]) -> Result<FeatureTable> {
        let family = features.family();
        let buffers = self.buffers;
        let n = buffers.len();
        let buffer_areas = buffers.areas();

        let mut stats = groups.par_iter()
            .map(|group| -> Result<(Group, AreaStats)> {
                let subset = features.of_group(group);
                let areas = subset.iter()
                    .map(|feature| measure(family, feature, feature.area, "area"))
                    .collect::<Result<Vec<_>>>()?;
                let pairs = join(family, &subset, buffers)?;
                debug!(%family, %group, features = subset.len(), matches = pairs.len(), "joined");
                Ok((group.clone(), AreaStats::from_pairs(&pairs, n, |f| areas[f])))
            })
            .collect::<Result<Vec<_>>>()?;
        stats.sort_by(|a, b| a.0.cmp(&b.0));

        let columns = stats.iter().map(|(group, s)| s.columns(group, family, &buffer_areas)).collect();
        let totals = AreaStats::totals(family, stats.iter().map(|(_, s)| s), &buffer_areas);

        FeatureTable::assemble(family, &self.options.id_field, buffers, columns, totals)
    }

    fn network(&self, features: &FeatureSet, groups: &[Group]) -> Result<FeatureTable> {
        let family = features.family();
        let buffers = self.buffers;
        let n = buffers.len();
        let centroids = buffers.centroids();
        let unit = self.options.distance_unit;

        let mut stats = groups.par_iter()
            .map(|group| -> Result<(Group, LengthStats, NearestStats)> {
                let subset = features.of_group(group);
                let lengths = subset.iter()
                    .map(|feature| measure(family, feature, feature.length, "length"))
                    .collect::<Result<Vec<_>>>()?;
                let pairs = join(family, &subset, buffers)?;

                let index = VertexIndex::build(&subset);
                let nearest = NearestStats::query(&index, &centroids, unit);
                debug!(%family, %group, features = subset.len(), vertices = index.len(), matches = pairs.len(), "joined");

                Ok((group.clone(), LengthStats::from_pairs(&pairs, n, |f| lengths[f]), nearest))
            })
            .collect::<Result<Vec<_>>>()?;
        stats.sort_by(|a, b| a.0.cmp(&b.0));

        let columns = stats.iter()
            .map(|(group, lengths, nearest)| {
                let mut columns = lengths.columns(group, family);
                columns.extend(nearest.columns(group, family));
                GroupColumns { group: group.clone(), columns }
            })
            .collect();

        let mut totals = LengthStats::totals(family, stats.iter().map(|(_, s, _)| s), n);
        totals.extend(NearestStats::totals(family, stats.iter().map(|(_, _, s)| s), n));

        FeatureTable::assemble(family, &self.options.id_field, buffers, columns, totals)
    }
}

/// Spatial join of one group's features against every buffer.
fn join(family: Family, subset: &[&ClassifiedFeature], buffers: &Buffers) -> Result<Vec<JoinPair>> {
    Ok(SpatialIndex::build(family, subset)?.bulk_join(buffers))
}

/// A projected measure that `FeatureSet::measure` should have filled in.
fn measure(family: Family, feature: &ClassifiedFeature, value: Option<f64>, what: &str) -> Result<f64> {
    value.ok_or_else(|| FeatureError::Geometry {
        family: family.to_string(),
        group: feature.group.to_string(),
        feature: feature.id.clone(),
        reason: format!("missing projected {what}"),
    })
}

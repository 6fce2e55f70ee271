use std::collections::BTreeMap;

use geo::{Area, BoundingRect, Coord, Euclidean, Intersects, Length, MultiLineString, MultiPolygon, Point, Rect};

use crate::{
    classify::{Crosswalk, Group},
    error::{FeatureError, Result},
    family::{Family, FamilyKind},
    geom::Projector,
};

/// Geometry of an OSM feature, in lon/lat.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Point(Point<f64>),
    Line(MultiLineString<f64>),
    Polygon(MultiPolygon<f64>),
}

impl FeatureGeometry {
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureGeometry::Point(_) => "point",
            FeatureGeometry::Line(_) => "line",
            FeatureGeometry::Polygon(_) => "polygon",
        }
    }

    /// Bounding rectangle, or `None` for an empty geometry.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            FeatureGeometry::Point(point) => Some(point.bounding_rect()),
            FeatureGeometry::Line(line) => line.bounding_rect(),
            FeatureGeometry::Polygon(polygon) => polygon.bounding_rect(),
        }
    }

    /// Whether the geometry intersects a buffer zone.
    pub fn intersects(&self, zone: &MultiPolygon<f64>) -> bool {
        match self {
            FeatureGeometry::Point(point) => zone.intersects(point),
            FeatureGeometry::Line(line) => zone.intersects(line),
            FeatureGeometry::Polygon(polygon) => zone.intersects(polygon),
        }
    }

    /// Vertices of a line geometry in order, part after part. Empty for other kinds.
    pub fn line_vertices(&self) -> impl Iterator<Item = Coord<f64>> + '_ {
        let parts = match self {
            FeatureGeometry::Line(line) => line.0.as_slice(),
            _ => &[],
        };
        parts.iter().flat_map(|part| part.0.iter().copied())
    }
}

/// A feature as delivered by a loader, before classification.
#[derive(Debug, Clone)]
pub struct RawFeature {
    pub id: String,
    pub geometry: FeatureGeometry,
    pub raw_type: Option<String>,
}

/// A feature with its analysis group and, where the family needs it, a projected measure.
#[derive(Debug, Clone)]
pub struct ClassifiedFeature {
    pub id: String,
    pub geometry: FeatureGeometry,
    pub raw_type: Option<String>,
    pub group: Group,
    pub area: Option<f64>,   // m², polygons of area families
    pub length: Option<f64>, // m, lines of network families
}

/// All classified features of one family.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    family: Family,
    features: Vec<ClassifiedFeature>,
}

impl FeatureSet {
    /// Assign every raw feature exactly one group. No feature is dropped.
    pub fn classify(family: Family, raw: Vec<RawFeature>, crosswalk: &Crosswalk) -> Self {
        let features = raw.into_iter()
            .map(|feature| ClassifiedFeature {
                group: crosswalk.resolve(feature.raw_type.as_deref()),
                id: feature.id,
                geometry: feature.geometry,
                raw_type: feature.raw_type,
                area: None,
                length: None,
            })
            .collect();
        Self { family, features }
    }

    #[inline] pub fn family(&self) -> Family { self.family }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[ClassifiedFeature] { &self.features }

    /// Number of features per group, sorted by group.
    pub fn group_counts(&self) -> BTreeMap<Group, usize> {
        let mut counts = BTreeMap::new();
        for feature in &self.features {
            *counts.entry(feature.group.clone()).or_default() += 1;
        }
        counts
    }

    /// Distinct groups present in the data, sorted.
    pub fn groups(&self) -> Vec<Group> {
        self.group_counts().into_keys().collect()
    }

    /// Features belonging to `group`, in input order.
    pub fn of_group(&self, group: &Group) -> Vec<&ClassifiedFeature> {
        self.features.iter().filter(|feature| &feature.group == group).collect()
    }

    /// Keep only features whose group satisfies `keep`.
    pub fn retain_groups(&mut self, keep: impl Fn(&Group) -> bool) {
        self.features.retain(|feature| keep(&feature.group));
    }

    /// Move every feature of the groups matched by `from` into `into`.
    pub fn relabel(&mut self, from: impl Fn(&Group) -> bool, into: &Group) {
        for feature in self.features.iter_mut().filter(|feature| from(&feature.group)) {
            feature.group = into.clone();
        }
    }

    /// Compute the projected measure the family needs: area for buildings, length for roads.
    /// Count families carry no measure.
    pub fn measure(&mut self, projector: &Projector) -> Result<()> {
        let family = self.family;
        let kind = family.kind();
        if kind == FamilyKind::Count { return Ok(()) }

        for feature in &mut self.features {
            let invalid = |reason: String| FeatureError::Geometry {
                family: family.to_string(),
                group: feature.group.to_string(),
                feature: feature.id.clone(),
                reason,
            };

            match (kind, &feature.geometry) {
                (FamilyKind::Area, FeatureGeometry::Polygon(polygon)) => {
                    let projected = projector.to_projected(polygon)
                        .map_err(|e| invalid(e.to_string()))?;
                    feature.area = Some(projected.unsigned_area());
                }
                (FamilyKind::Network, FeatureGeometry::Line(line)) => {
                    let projected = projector.to_projected(line)
                        .map_err(|e| invalid(e.to_string()))?;
                    feature.length = Some(projected.0.iter().map(|part| Euclidean.length(part)).sum());
                }
                (_, geometry) => {
                    return Err(invalid(format!("unexpected {} geometry for {family}", geometry.kind())));
                }
            }
        }
        Ok(())
    }
}

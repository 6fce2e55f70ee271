use rstar::RTree;

use crate::{
    error::{FeatureError, Result},
    family::Family,
    geom::BoundingBox,
    store::{Buffers, ClassifiedFeature},
};

/// A buffer and a feature whose geometries intersect, by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JoinPair {
    pub buffer: usize,
    pub feature: usize,
}

/// R-tree over the bounding boxes of one feature collection.
pub struct SpatialIndex<'a> {
    features: &'a [&'a ClassifiedFeature],
    rtree: RTree<BoundingBox>,
}

impl<'a> SpatialIndex<'a> {
    /// Index `features`. A feature without a bounding box (empty geometry) is a structural error.
    pub fn build(family: Family, features: &'a [&'a ClassifiedFeature]) -> Result<Self> {
        let boxes = features.iter().enumerate()
            .map(|(i, feature)| {
                feature.geometry.bounding_rect()
                    .map(|bbox| BoundingBox::new(i, bbox))
                    .ok_or_else(|| FeatureError::Geometry {
                        family: family.to_string(),
                        group: feature.group.to_string(),
                        feature: feature.id.clone(),
                        reason: format!("empty {} geometry", feature.geometry.kind()),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { features, rtree: RTree::bulk_load(boxes) })
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    /// All (buffer, feature) pairs whose geometries intersect, sorted by buffer then feature.
    /// A feature intersecting several buffers appears once per buffer.
    pub fn bulk_join(&self, buffers: &Buffers) -> Vec<JoinPair> {
        let mut pairs = Vec::new();

        for (b, buffer) in buffers.iter().enumerate() {
            let envelope = BoundingBox::envelope_of(&buffer.bbox);

            // Among bbox candidates, keep the features whose geometry touches the buffer.
            let mut hits = self.rtree
                .locate_in_envelope_intersecting(&envelope)
                .map(|bb| bb.idx())
                .filter(|&f| self.features[f].geometry.intersects(&buffer.geometry))
                .collect::<Vec<_>>();
            hits.sort_unstable();

            pairs.extend(hits.into_iter().map(|feature| JoinPair { buffer: b, feature }));
        }

        pairs
    }
}

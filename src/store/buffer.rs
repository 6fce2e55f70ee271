use ahash::AHashSet;
use geo::{Area, BoundingRect, Centroid, MultiPolygon, Point, Rect};

use crate::{error::{FeatureError, Result}, geom::Projector};

/// An analysis zone: a polygon around a survey location.
#[derive(Debug, Clone)]
pub struct Buffer {
    pub id: String,
    pub geometry: MultiPolygon<f64>, // lon/lat (WGS84)
    pub bbox: Rect<f64>,             // lon/lat
    pub area: f64,                   // projected units (m²)
    pub centroid: Point<f64>,        // lon/lat, computed in the projected CRS
}

/// The ordered collection of buffers shared by every feature family.
#[derive(Debug, Clone, Default)]
pub struct Buffers {
    buffers: Vec<Buffer>,
}

impl Buffers {
    /// Build buffers from `(id, polygon)` records in lon/lat.
    ///
    /// Area and centroid are measured after projecting with `projector`;
    /// the centroid is converted back to lon/lat for nearest-neighbor queries.
    pub fn new(records: Vec<(String, MultiPolygon<f64>)>, projector: &Projector) -> Result<Self> {
        let mut buffers = Vec::with_capacity(records.len());
        let mut seen = AHashSet::with_capacity(records.len());

        for (id, geometry) in records {
            if seen.contains(&id) {
                return Err(FeatureError::Buffer { id, reason: "duplicate buffer id".into() });
            }

            let invalid = |reason: String| FeatureError::Buffer { id: id.clone(), reason };

            let bbox = geometry.bounding_rect()
                .ok_or_else(|| invalid("empty polygon".into()))?;

            let projected = projector.to_projected(&geometry)
                .map_err(|e| invalid(e.to_string()))?;

            let area = projected.unsigned_area();
            if !(area > 0.0) {
                return Err(invalid(format!("polygon has no area ({area})")));
            }

            let centroid = projected.centroid()
                .ok_or_else(|| invalid("polygon has no centroid".into()))?;
            let centroid = Point::from(projector.inverse(centroid.0)
                .map_err(|e| invalid(e.to_string()))?);

            seen.insert(id.clone());
            buffers.push(Buffer { id, geometry, bbox, area, centroid });
        }

        Ok(Self { buffers })
    }

    /// Get the number of buffers.
    #[inline] pub fn len(&self) -> usize { self.buffers.len() }

    /// Check if there are no buffers.
    #[inline] pub fn is_empty(&self) -> bool { self.buffers.is_empty() }

    #[inline] pub fn get(&self, idx: usize) -> Option<&Buffer> { self.buffers.get(idx) }

    #[inline] pub fn iter(&self) -> std::slice::Iter<'_, Buffer> { self.buffers.iter() }

    /// Buffer ids, in input order.
    pub fn ids(&self) -> Vec<&str> {
        self.buffers.iter().map(|buffer| buffer.id.as_str()).collect()
    }

    /// Buffer areas in projected units, in input order.
    pub fn areas(&self) -> Vec<f64> {
        self.buffers.iter().map(|buffer| buffer.area).collect()
    }

    /// Buffer centroids in lon/lat, in input order.
    pub fn centroids(&self) -> Vec<Point<f64>> {
        self.buffers.iter().map(|buffer| buffer.centroid).collect()
    }
}

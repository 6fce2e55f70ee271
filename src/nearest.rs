//! Nearest road vertex from buffer centroids, by great-circle distance.
//!
//! Vertices are placed on the unit sphere as 3-D points and indexed with an R-tree.
//! Chord length increases monotonically with central angle, so the Euclidean
//! nearest neighbour on the sphere is also the great-circle nearest neighbour.

use geo::Point;
use rayon::prelude::*;
use rstar::{primitives::GeomWithData, RTree};

use crate::{
    aggregate::{group_column, total_column},
    classify::Group,
    family::Family,
    geom::{unit_vector, DistanceUnit},
    store::ClassifiedFeature,
    table::{NamedColumn, Values},
};

/// One vertex of a line, tagged with its owning line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexRecord {
    pub line: usize, // Index of the owning line in the indexed collection
    pub lon: f64,
    pub lat: f64,
}

/// The vertex closest to a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestVertex<'a> {
    pub line_id: &'a str,
    pub vertex: Point<f64>,
    pub distance: f64, // In the unit requested by the caller
}

type SphereVertex = GeomWithData<[f64; 3], usize>;

/// Nearest-neighbor structure over the vertices of one line group.
pub struct VertexIndex {
    line_ids: Vec<String>,
    vertices: Vec<VertexRecord>,
    tree: RTree<SphereVertex>,
}

impl VertexIndex {
    /// Decompose every line into its vertices and index them.
    pub fn build(lines: &[&ClassifiedFeature]) -> Self {
        let vertices: Vec<VertexRecord> = lines.iter().enumerate()
            .flat_map(|(line, feature)| {
                feature.geometry.line_vertices()
                    .map(move |coord| VertexRecord { line, lon: coord.x, lat: coord.y })
            })
            .collect();

        let tree = RTree::bulk_load(
            vertices.iter().enumerate()
                .map(|(i, vertex)| GeomWithData::new(unit_vector(vertex.lon, vertex.lat), i))
                .collect()
        );

        Self {
            line_ids: lines.iter().map(|feature| feature.id.clone()).collect(),
            vertices,
            tree,
        }
    }

    /// Number of indexed vertices.
    #[inline] pub fn len(&self) -> usize { self.vertices.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.vertices.is_empty() }

    #[inline] pub fn vertices(&self) -> &[VertexRecord] { &self.vertices }

    /// The vertex nearest to `point` (lon/lat), or `None` when there are no vertices.
    pub fn nearest(&self, point: Point<f64>, unit: DistanceUnit) -> Option<NearestVertex<'_>> {
        let hit = self.tree.nearest_neighbor(&unit_vector(point.x(), point.y()))?;
        let record = &self.vertices[hit.data];
        let vertex = Point::new(record.lon, record.lat);

        Some(NearestVertex {
            line_id: &self.line_ids[record.line],
            vertex,
            distance: unit.distance(point, vertex),
        })
    }
}

/// Nearest line id and distance for every buffer centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestStats {
    pub line_ids: Vec<Option<String>>,
    pub distances: Vec<Option<f64>>,
}

impl NearestStats {
    /// Query the nearest vertex for each centroid, in centroid order.
    pub fn query(index: &VertexIndex, centroids: &[Point<f64>], unit: DistanceUnit) -> Self {
        let (line_ids, distances) = centroids.par_iter()
            .map(|&centroid| match index.nearest(centroid, unit) {
                Some(hit) => (Some(hit.line_id.to_string()), Some(hit.distance)),
                None => (None, None),
            })
            .unzip();
        Self { line_ids, distances }
    }

    /// `<group>_<family>_nearest-osmid` and `<group>_<family>_nearestdist`.
    pub fn columns(&self, group: &Group, family: Family) -> Vec<NamedColumn> {
        vec![
            NamedColumn::new(group_column(group, family, "nearest-osmid"), Values::Text(self.line_ids.clone())),
            NamedColumn::new(group_column(group, family, "nearestdist"), Values::OptFloat(self.distances.clone())),
        ]
    }

    /// `all_<family>_nearestdist`: the minimum over groups, undefined when no group has a distance.
    pub fn totals<'a>(family: Family, groups: impl IntoIterator<Item = &'a NearestStats>, num_buffers: usize) -> Vec<NamedColumn> {
        let mut nearest: Vec<Option<f64>> = vec![None; num_buffers];
        for stats in groups {
            for (best, distance) in nearest.iter_mut().zip(&stats.distances) {
                if let Some(d) = *distance {
                    *best = Some(best.map_or(d, |b| b.min(d)));
                }
            }
        }
        vec![NamedColumn::new(total_column(family, "nearestdist"), Values::OptFloat(nearest))]
    }
}

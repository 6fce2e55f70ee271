use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Mean Earth radius (IUGG), in meters. The radius `geo::Haversine` measures with.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Unit used to report great-circle distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    /// Central angle on the unit sphere.
    Radians,
}

impl DistanceUnit {
    /// Haversine distance between two lon/lat points (degrees), in this unit.
    pub fn distance(&self, a: Point<f64>, b: Point<f64>) -> f64 {
        self.convert(Haversine.distance(a, b))
    }

    /// Convert a great-circle distance in meters into this unit.
    #[inline]
    pub fn convert(&self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Meters => meters,
            DistanceUnit::Kilometers => meters / 1000.0,
            DistanceUnit::Radians => meters / EARTH_RADIUS_M,
        }
    }
}

/// Position of a lon/lat point (degrees) on the unit sphere.
/// Chord length between these vectors grows monotonically with the central angle.
pub fn unit_vector(lon: f64, lat: f64) -> [f64; 3] {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

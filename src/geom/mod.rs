mod bbox;
mod proj;
mod sphere;

pub(crate) use bbox::BoundingBox;
pub use proj::{Projector, ProjectedCrs, GEOGRAPHIC_PROJ4};
pub use sphere::{unit_vector, DistanceUnit, EARTH_RADIUS_M};

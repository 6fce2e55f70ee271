//! File formats at the edge of the pipeline.
//!
//! - `shp` - OSM feature layers from Geofabrik shapefile exports
//! - `geojson` - buffer polygons
//! - `csv` - crosswalk tables in, feature tables out

pub mod csv;
pub mod geojson;
pub mod shp;

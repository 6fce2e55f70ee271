use std::fmt;

use geo::{Coord, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, Result};

/// PROJ.4 string of the geographic CRS all inputs are expressed in (WGS84 lon/lat).
pub const GEOGRAPHIC_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// The projected CRS used for area and length measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectedCrs {
    /// A UTM EPSG code: 326zz (WGS84 north), 327zz (WGS84 south) or 269zz (NAD83).
    Epsg(u32),
    /// A raw PROJ.4 definition of a projected (metric) CRS.
    Proj4(String),
}

impl ProjectedCrs {
    /// Build the PROJ.4 string for this CRS.
    pub fn to_proj4(&self) -> Result<String> {
        match self {
            ProjectedCrs::Epsg(code) => {
                let (zone, south, datum) = match *code {
                    32601..=32660 => (code - 32600, false, "WGS84"),
                    32701..=32760 => (code - 32700, true, "WGS84"),
                    26901..=26923 => (code - 26900, false, "NAD83"),
                    _ => return Err(FeatureError::Config(format!(
                        "EPSG:{code} is not a supported UTM code; pass a proj4 definition instead"
                    ))),
                };
                let south = if south { " +south" } else { "" };
                Ok(format!("+proj=utm +zone={zone}{south} +datum={datum} +units=m +no_defs +type=crs"))
            }
            ProjectedCrs::Proj4(definition) => {
                let lowered = definition.to_ascii_lowercase();
                if lowered.contains("+proj=longlat") || lowered.contains("+proj=latlong") {
                    return Err(FeatureError::Config(format!(
                        "projected CRS must be metric, got geographic definition: {definition}"
                    )));
                }
                Ok(definition.trim().to_string())
            }
        }
    }
}

/// Transforms geometries between WGS84 lon/lat (degrees) and a projected metric CRS.
pub struct Projector {
    geographic: Proj4,
    projected: Proj4,
    definition: String,
}

impl fmt::Debug for Projector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projector").field("definition", &self.definition).finish()
    }
}

impl Projector {
    pub fn new(crs: &ProjectedCrs) -> Result<Self> {
        let definition = crs.to_proj4()?;

        let geographic = Proj4::from_proj_string(GEOGRAPHIC_PROJ4)
            .map_err(|e| FeatureError::Projection {
                context: format!("failed to build source PROJ.4: {GEOGRAPHIC_PROJ4}"),
                reason: e.to_string(),
            })?;

        let projected = Proj4::from_proj_string(&definition)
            .map_err(|e| FeatureError::Projection {
                context: format!("failed to build target PROJ.4: {definition}"),
                reason: e.to_string(),
            })?;

        Ok(Self { geographic, projected, definition })
    }

    /// The PROJ.4 definition of the projected CRS.
    #[inline] pub fn definition(&self) -> &str { &self.definition }

    /// Project a lon/lat coordinate (degrees) to the metric CRS (meters).
    pub fn forward(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(&self.geographic, &self.projected, &mut point)
            .map_err(|e| FeatureError::Projection {
                context: format!("forward transform of ({}, {})", coord.x, coord.y),
                reason: e.to_string(),
            })?;
        finite(Coord { x: point.0, y: point.1 }, coord)
    }

    /// Unproject a metric coordinate back to lon/lat (degrees).
    pub fn inverse(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x, coord.y, 0.0);
        transform(&self.projected, &self.geographic, &mut point)
            .map_err(|e| FeatureError::Projection {
                context: format!("inverse transform of ({}, {})", coord.x, coord.y),
                reason: e.to_string(),
            })?;
        finite(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }, coord)
    }

    /// Reproject a geometry from lon/lat to the metric CRS.
    pub fn to_projected<G: MapCoords<f64, f64>>(&self, geom: &G) -> Result<G::Output> {
        geom.try_map_coords(|coord| self.forward(coord))
    }

    /// Reproject a geometry from the metric CRS back to lon/lat.
    pub fn to_geographic<G: MapCoords<f64, f64>>(&self, geom: &G) -> Result<G::Output> {
        geom.try_map_coords(|coord| self.inverse(coord))
    }
}

/// Reject NaN/inf results, which proj4rs may return for out-of-domain input.
fn finite(out: Coord<f64>, input: Coord<f64>) -> Result<Coord<f64>> {
    if out.x.is_finite() && out.y.is_finite() {
        Ok(out)
    } else {
        Err(FeatureError::Projection {
            context: format!("transform of ({}, {})", input.x, input.y),
            reason: "result is not finite".into(),
        })
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// A family of OSM features, each producing one output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Pois,       // Points and areas of interest
    Traffic,    // Traffic infrastructure (signals, crossings, ...)
    Transport,  // Transport stops and stations
    Buildings,  // Building footprints (areas)
    Roads,      // Road network (lines)
}

/// The statistics computed for a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyKind {
    /// Feature count per group.
    Count,
    /// Count, mean/total area and area ratio per group.
    Area,
    /// Count, total length and nearest-vertex distance per group.
    Network,
}

impl Family {
    pub fn to_str(&self) -> &'static str {
        match self {
            Family::Pois => "pois",
            Family::Traffic => "traffic",
            Family::Transport => "transport",
            Family::Buildings => "buildings",
            Family::Roads => "roads",
        }
    }

    pub fn kind(&self) -> FamilyKind {
        match self {
            Family::Pois | Family::Traffic | Family::Transport => FamilyKind::Count,
            Family::Buildings => FamilyKind::Area,
            Family::Roads => FamilyKind::Network,
        }
    }

    /// Name of the attribute holding the raw feature type.
    pub fn type_field(&self) -> &'static str {
        match self {
            Family::Buildings => "type",
            _ => "fclass",
        }
    }

    /// Whether the family has a separate area layer (`gis_osm_<name>_a_free_1`).
    pub fn has_area_layer(&self) -> bool {
        matches!(self, Family::Pois | Family::Traffic | Family::Transport)
    }

    /// Base name of the layer in a Geofabrik free shapefile export.
    pub fn layer_name(&self) -> &'static str {
        match self {
            Family::Buildings => "buildings_a",
            other => other.to_str(),
        }
    }

    pub fn order() -> [Family; 5] {
        [
            Family::Pois,
            Family::Traffic,
            Family::Transport,
            Family::Buildings,
            Family::Roads,
        ]
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for Family {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::order()
            .into_iter()
            .find(|family| family.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FeatureError::Config(format!("unknown feature family: {s:?}")))
    }
}

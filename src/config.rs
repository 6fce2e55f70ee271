use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::{
    extract::{ExtractOptions, ThresholdPolicy},
    family::Family,
    geom::{DistanceUnit, ProjectedCrs},
};

/// Where buffers come from and how they are keyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BufferSource {
    /// GeoJSON FeatureCollection of buffer polygons.
    pub path: PathBuf,
    /// Property holding the buffer id, also the first output column.
    #[serde(default = "default_id_field")]
    pub id_field: String,
}

fn default_id_field() -> String { "geom_id".into() }

/// Per-family replacements for the default input layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceOverride {
    pub shapefiles: Vec<PathBuf>,
    pub crosswalk: Option<PathBuf>,
}

/// Run configuration, read from JSON.
///
/// Relative paths resolve against `data_dir`. Shapefiles default to the Geofabrik free
/// export layout under `{data_dir}/osm`, crosswalks to `{data_dir}/crosswalks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub data_dir: PathBuf,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    pub country: String,
    pub osm_date: String,
    pub geom_label: String,
    pub buffers: BufferSource,
    pub projected_crs: ProjectedCrs,
    #[serde(default)]
    pub min_road_features: usize,
    #[serde(default)]
    pub below_threshold: ThresholdPolicy,
    #[serde(default)]
    pub distance_unit: DistanceUnit,
    #[serde(default)]
    pub sources: BTreeMap<Family, SourceOverride>,
}

impl Config {
    /// Read and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("[config] Invalid configuration in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("[config] Failed to parse JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.country.trim().is_empty(), "[config] country must not be empty");
        ensure!(!self.osm_date.trim().is_empty(), "[config] osm_date must not be empty");
        ensure!(!self.geom_label.trim().is_empty(), "[config] geom_label must not be empty");
        ensure!(!self.buffers.id_field.trim().is_empty(), "[config] buffers.id_field must not be empty");
        self.projected_crs.to_proj4()?;
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.data_dir.join(path)
    }

    #[inline] pub fn buffers_path(&self) -> PathBuf { self.resolve(&self.buffers.path) }

    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => self.resolve(dir),
            None => self.data_dir.join("outputs").join("osm_features"),
        }
    }

    /// `{output_dir}/{geom_label}_{family}_{osm_date}.csv`
    pub fn output_path(&self, family: Family) -> PathBuf {
        self.output_dir().join(format!("{}_{family}_{}.csv", self.geom_label, self.osm_date))
    }

    /// Shapefiles holding the features of `family`, in load order.
    pub fn shapefiles(&self, family: Family) -> Vec<PathBuf> {
        if let Some(paths) = self.sources.get(&family).filter(|s| !s.shapefiles.is_empty()) {
            return paths.shapefiles.iter().map(|path| self.resolve(path)).collect();
        }

        let dir = self.data_dir.join("osm").join(format!("{}-{}-free.shp", self.country, self.osm_date));
        let mut layers = vec![family.layer_name().to_string()];
        if family.has_area_layer() {
            layers.push(format!("{family}_a"));
        }
        layers.iter().map(|layer| dir.join(format!("gis_osm_{layer}_free_1.shp"))).collect()
    }

    pub fn crosswalk_path(&self, family: Family) -> PathBuf {
        match self.sources.get(&family).and_then(|s| s.crosswalk.as_ref()) {
            Some(path) => self.resolve(path),
            None => self.data_dir.join("crosswalks").join(format!("{family}_type_crosswalk.csv")),
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            id_field: self.buffers.id_field.clone(),
            min_road_features: self.min_road_features,
            below_threshold: self.below_threshold,
            distance_unit: self.distance_unit,
        }
    }
}

#![doc = "Per-buffer OpenStreetMap covariates: group counts, building areas, road lengths and nearest-road distances"]
mod aggregate;
mod classify;
mod config;
mod error;
mod extract;
mod family;
mod geom;
mod join;
mod nearest;
mod pipeline;
mod store;
mod table;

pub mod io;

#[doc(inline)]
pub use aggregate::{AreaStats, CountStats, LengthStats, group_column, total_column};

#[doc(inline)]
pub use classify::{Crosswalk, Group};

#[doc(inline)]
pub use config::{BufferSource, Config, SourceOverride};

#[doc(inline)]
pub use error::{FeatureError, Result};

#[doc(inline)]
pub use extract::{ExtractOptions, Extractor, ThresholdPolicy};

#[doc(inline)]
pub use family::{Family, FamilyKind};

#[doc(inline)]
pub use geom::{DistanceUnit, ProjectedCrs, Projector, EARTH_RADIUS_M, GEOGRAPHIC_PROJ4};

#[doc(inline)]
pub use join::{JoinPair, SpatialIndex};

#[doc(inline)]
pub use nearest::{NearestStats, NearestVertex, VertexIndex, VertexRecord};

#[doc(inline)]
pub use pipeline::{GroupSummary, Pipeline};

#[doc(inline)]
pub use store::{Buffer, Buffers, ClassifiedFeature, FeatureGeometry, FeatureSet, RawFeature};

#[doc(inline)]
pub use table::{FeatureTable, GroupColumns, NamedColumn, Values};

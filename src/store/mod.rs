mod buffer;
mod feature;

pub use buffer::{Buffer, Buffers};
pub use feature::{ClassifiedFeature, FeatureGeometry, FeatureSet, RawFeature};

use thiserror::Error;

/// Errors raised by the feature-extraction engine.
///
/// Sparse data (empty groups, buffers without matches) is never an error;
/// these variants cover structural problems with the inputs or configuration.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Configuration is inconsistent (bad group names, unsupported CRS, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// A coordinate could not be transformed between CRSs.
    #[error("projection error ({context}): {reason}")]
    Projection { context: String, reason: String },

    /// A feature geometry is unusable for the requested operation.
    #[error("invalid geometry in {family} (group {group}, feature {feature}): {reason}")]
    Geometry {
        family: String,
        group: String,
        feature: String,
        reason: String,
    },

    /// A buffer zone is unusable (empty polygon, duplicate id, ...).
    #[error("invalid buffer {id}: {reason}")]
    Buffer { id: String, reason: String },

    /// A crosswalk table is inconsistent.
    #[error("crosswalk error: {0}")]
    Crosswalk(String),

    /// Two output columns would share a name, or a column has the wrong length.
    #[error("column error: {0}")]
    Column(String),
}

pub type Result<T, E = FeatureError> = std::result::Result<T, E>;

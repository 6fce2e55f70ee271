use std::{fmt, sync::Arc};

use crate::error::{FeatureError, Result};

/// An analysis group that raw feature types are reclassified into.
///
/// Groups are discovered from crosswalk tables at runtime, so they are
/// validated strings rather than an enum. The name is embedded in output
/// column names, which is why "all" and empty names are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Group(Arc<str>);

impl Group {
    /// Crosswalk value meaning "reassign to other".
    pub const ZERO_SENTINEL: &'static str = "0";
    pub const OTHER: &'static str = "other";
    pub const UNCLASSIFIED: &'static str = "unclassified";
    /// Reserved for the family-wide total columns.
    pub const ALL: &'static str = "all";

    /// Validate and wrap a group name. The "0" sentinel is mapped to "other".
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FeatureError::Crosswalk("group name is empty".into()));
        }
        if name.eq_ignore_ascii_case(Self::ALL) {
            return Err(FeatureError::Crosswalk(format!(
                "group name {name:?} is reserved for family totals"
            )));
        }
        if name == Self::ZERO_SENTINEL {
            return Ok(Self::other());
        }
        Ok(Self(name.into()))
    }

    #[inline] pub fn other() -> Self { Self(Self::OTHER.into()) }

    #[inline] pub fn unclassified() -> Self { Self(Self::UNCLASSIFIED.into()) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }

    /// "other" and "unclassified" carry no information about the feature type.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self.as_str(), Self::OTHER | Self::UNCLASSIFIED)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

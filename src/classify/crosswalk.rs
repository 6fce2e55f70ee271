use std::collections::BTreeSet;

use ahash::AHashMap;

use super::Group;
use crate::error::{FeatureError, Result};

/// Lookup table from raw OSM feature type (`fclass`/`type`) to analysis group.
#[derive(Debug, Clone, Default)]
pub struct Crosswalk {
    groups: AHashMap<String, Group>,
}

impl Crosswalk {
    /// Build a crosswalk from `(raw_type, group)` pairs.
    /// A group of "0" is stored as "other". Conflicting duplicate raw types are rejected.
    pub fn from_pairs<I, R, G>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (R, G)>,
        R: AsRef<str>,
        G: AsRef<str>,
    {
        let mut groups = AHashMap::new();
        for (raw, group) in pairs {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                return Err(FeatureError::Crosswalk("crosswalk contains an empty raw type".into()));
            }
            let group = Group::new(group.as_ref())
                .map_err(|e| FeatureError::Crosswalk(format!("raw type {raw:?}: {e}")))?;

            match groups.get(raw) {
                Some(existing) if existing != &group => {
                    return Err(FeatureError::Crosswalk(format!(
                        "raw type {raw:?} is mapped to both {existing:?} and {group:?}"
                    )));
                }
                Some(_) => {}
                None => { groups.insert(raw.to_string(), group); }
            }
        }
        Ok(Self { groups })
    }

    /// Number of raw types in the table.
    #[inline] pub fn len(&self) -> usize { self.groups.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.groups.is_empty() }

    /// Resolve a raw type to its group.
    /// Missing and unmapped raw types resolve to "unclassified"; the "0" sentinel to "other".
    pub fn resolve(&self, raw_type: Option<&str>) -> Group {
        raw_type
            .and_then(|raw| self.groups.get(raw.trim()))
            .cloned()
            .unwrap_or_else(Group::unclassified)
    }

    /// Distinct groups named by the table, sorted.
    pub fn groups(&self) -> BTreeSet<Group> {
        self.groups.values().cloned().collect()
    }
}

use std::collections::HashSet;

use anyhow::Context;
use polars::{frame::DataFrame, prelude::Column};

use crate::{
    classify::Group,
    error::{FeatureError, Result},
    family::Family,
    store::Buffers,
};

/// Values of one output column, one entry per buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Count(Vec<u64>),
    Float(Vec<f64>),
    /// Floats that may be undefined (nearest distances with no vertices).
    OptFloat(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Count(v) => v.len(),
            Values::Float(v) => v.len(),
            Values::OptFloat(v) => v.len(),
            Values::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// A named output column.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColumn {
    pub name: String,
    pub values: Values,
}

impl NamedColumn {
    pub fn new(name: impl Into<String>, values: Values) -> Self {
        Self { name: name.into(), values }
    }

    fn to_polars(&self) -> Column {
        let name = self.name.as_str().into();
        match &self.values {
            Values::Count(v) => Column::new(name, v),
            Values::Float(v) => Column::new(name, v),
            Values::OptFloat(v) => Column::new(name, v),
            Values::Text(v) => Column::new(name, v),
        }
    }
}

/// The columns one group contributes to a family table.
#[derive(Debug, Clone)]
pub struct GroupColumns {
    pub group: Group,
    pub columns: Vec<NamedColumn>,
}

/// A wide table with one row per buffer, keyed by buffer id.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    family: Family,
    id_field: String,
    ids: Vec<String>,
    columns: Vec<NamedColumn>,
}

impl FeatureTable {
    /// Merge per-group column sets and the family totals into one table.
    ///
    /// Groups are laid out in sorted order, so the result does not depend on the
    /// order in which group computations finished.
    pub fn assemble(
        family: Family,
        id_field: &str,
        buffers: &Buffers,
        mut groups: Vec<GroupColumns>,
        totals: Vec<NamedColumn>,
    ) -> Result<Self> {
        groups.sort_by(|a, b| a.group.cmp(&b.group));

        let mut names = HashSet::from([id_field.to_string()]);
        let mut columns = Vec::new();

        for column in groups.into_iter().flat_map(|g| g.columns).chain(totals) {
            if column.values.len() != buffers.len() {
                return Err(FeatureError::Column(format!(
                    "{family}: column {} has {} rows, expected {}",
                    column.name, column.values.len(), buffers.len()
                )));
            }
            if !names.insert(column.name.clone()) {
                return Err(FeatureError::Column(format!(
                    "{family}: duplicate column name {}", column.name
                )));
            }
            columns.push(column);
        }

        Ok(Self {
            family,
            id_field: id_field.to_string(),
            ids: buffers.ids().into_iter().map(String::from).collect(),
            columns,
        })
    }

    #[inline] pub fn family(&self) -> Family { self.family }

    #[inline] pub fn id_field(&self) -> &str { &self.id_field }

    /// Buffer ids, one per row.
    #[inline] pub fn ids(&self) -> &[String] { &self.ids }

    /// Number of rows (buffers).
    #[inline] pub fn height(&self) -> usize { self.ids.len() }

    #[inline] pub fn columns(&self) -> &[NamedColumn] { &self.columns }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Values> {
        self.columns.iter().find(|column| column.name == name).map(|column| &column.values)
    }

    pub fn counts(&self, name: &str) -> Option<&[u64]> {
        match self.column(name)? { Values::Count(v) => Some(v), _ => None }
    }

    pub fn floats(&self, name: &str) -> Option<&[f64]> {
        match self.column(name)? { Values::Float(v) => Some(v), _ => None }
    }

    pub fn opt_floats(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name)? { Values::OptFloat(v) => Some(v), _ => None }
    }

    pub fn texts(&self, name: &str) -> Option<&[Option<String>]> {
        match self.column(name)? { Values::Text(v) => Some(v), _ => None }
    }

    /// Convert to a Polars DataFrame, id column first.
    pub fn to_dataframe(&self) -> anyhow::Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new(self.id_field.as_str().into(), &self.ids));
        columns.extend(self.columns.iter().map(NamedColumn::to_polars));

        DataFrame::new(columns)
            .with_context(|| format!("[table] Failed to build {} DataFrame", self.family))
    }
}

use crate::{
    classify::Group,
    family::Family,
    join::JoinPair,
    table::{NamedColumn, Values},
};
use super::{count_by_buffer, group_column, sum_by_buffer, total_column};

/// Line counts and total line length of one group, per buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthStats {
    pub count: Vec<u64>,
    pub length: Vec<f64>, // Sum of full projected lengths of intersecting lines
}

impl LengthStats {
    /// `length(feature)` gives the projected length of a line by index.
    pub fn from_pairs(pairs: &[JoinPair], num_buffers: usize, length: impl Fn(usize) -> f64) -> Self {
        Self {
            count: count_by_buffer(pairs, num_buffers),
            length: sum_by_buffer(pairs, num_buffers, length),
        }
    }

    /// `count` and `length` columns of one group.
    pub fn columns(&self, group: &Group, family: Family) -> Vec<NamedColumn> {
        vec![
            NamedColumn::new(group_column(group, family, "count"), Values::Count(self.count.clone())),
            NamedColumn::new(group_column(group, family, "length"), Values::Float(self.length.clone())),
        ]
    }

    /// `all_<family>_count` and `all_<family>_length`. Groups are summed in the order given.
    pub fn totals<'a>(family: Family, groups: impl IntoIterator<Item = &'a LengthStats>, num_buffers: usize) -> Vec<NamedColumn> {
        let mut count = vec![0u64; num_buffers];
        let mut length = vec![0.0; num_buffers];
        for stats in groups {
            for (sum, c) in count.iter_mut().zip(&stats.count) { *sum += c; }
            for (sum, l) in length.iter_mut().zip(&stats.length) { *sum += l; }
        }
        vec![
            NamedColumn::new(total_column(family, "count"), Values::Count(count)),
            NamedColumn::new(total_column(family, "length"), Values::Float(length)),
        ]
    }
}

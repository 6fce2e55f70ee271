use crate::{
    classify::Group,
    family::Family,
    join::JoinPair,
    table::{GroupColumns, NamedColumn, Values},
};
use super::{count_by_buffer, group_column, ratio_or_zero, sum_by_buffer, total_column};

/// Area statistics of one group, per buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaStats {
    pub count: Vec<u64>,
    pub total: Vec<f64>, // Sum of matched feature areas
}

impl AreaStats {
    /// `area(feature)` gives the projected area of a feature by index.
    pub fn from_pairs(pairs: &[JoinPair], num_buffers: usize, area: impl Fn(usize) -> f64) -> Self {
        Self {
            count: count_by_buffer(pairs, num_buffers),
            total: sum_by_buffer(pairs, num_buffers, area),
        }
    }

    /// Mean area per buffer, 0 where nothing matched.
    pub fn average(&self) -> Vec<f64> {
        self.total.iter().zip(&self.count)
            .map(|(&total, &count)| ratio_or_zero(total, count as f64))
            .collect()
    }

    /// Share of each buffer's area covered by matched features.
    pub fn ratio(&self, buffer_areas: &[f64]) -> Vec<f64> {
        self.total.iter().zip(buffer_areas)
            .map(|(&total, &area)| ratio_or_zero(total, area))
            .collect()
    }

    /// `count`, `avgarea`, `totalarea`, `ratio` for one group.
    pub fn columns(&self, group: &Group, family: Family, buffer_areas: &[f64]) -> GroupColumns {
        GroupColumns {
            group: group.clone(),
            columns: vec![
                NamedColumn::new(group_column(group, family, "count"), Values::Count(self.count.clone())),
                NamedColumn::new(group_column(group, family, "avgarea"), Values::Float(self.average())),
                NamedColumn::new(group_column(group, family, "totalarea"), Values::Float(self.total.clone())),
                NamedColumn::new(group_column(group, family, "ratio"), Values::Float(self.ratio(buffer_areas))),
            ],
        }
    }

    /// Family totals. Groups are summed in the order given.
    pub fn totals<'a>(family: Family, groups: impl IntoIterator<Item = &'a AreaStats>, buffer_areas: &[f64]) -> Vec<NamedColumn> {
        let mut all = AreaStats {
            count: vec![0; buffer_areas.len()],
            total: vec![0.0; buffer_areas.len()],
        };
        for stats in groups {
            for (sum, count) in all.count.iter_mut().zip(&stats.count) { *sum += count; }
            for (sum, total) in all.total.iter_mut().zip(&stats.total) { *sum += total; }
        }

        vec![
            NamedColumn::new(total_column(family, "count"), Values::Count(all.count.clone())),
            NamedColumn::new(total_column(family, "totalarea"), Values::Float(all.total.clone())),
            NamedColumn::new(total_column(family, "avgarea"), Values::Float(all.average())),
            NamedColumn::new(total_column(family, "ratio"), Values::Float(all.ratio(buffer_areas))),
        ]
    }
}

use crate::{
    classify::Group,
    family::Family,
    join::JoinPair,
    table::{GroupColumns, NamedColumn, Values},
};
use super::{count_by_buffer, group_column, total_column};

/// Feature counts of one group, per buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct CountStats {
    pub count: Vec<u64>,
}

impl CountStats {
    pub fn from_pairs(pairs: &[JoinPair], num_buffers: usize) -> Self {
        Self { count: count_by_buffer(pairs, num_buffers) }
    }

    /// `<group>_<family>_count`.
    pub fn columns(&self, group: &Group, family: Family) -> GroupColumns {
        GroupColumns {
            group: group.clone(),
            columns: vec![
                NamedColumn::new(group_column(group, family, "count"), Values::Count(self.count.clone())),
            ],
        }
    }

    /// `all_<family>_count`: the sum of every group's count column.
    pub fn totals<'a>(family: Family, groups: impl IntoIterator<Item = &'a CountStats>, num_buffers: usize) -> Vec<NamedColumn> {
        let mut total = vec![0u64; num_buffers];
        for stats in groups {
            for (sum, count) in total.iter_mut().zip(&stats.count) {
                *sum += count;
            }
        }
        vec![NamedColumn::new(total_column(family, "count"), Values::Count(total))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_groups() {
        let a = CountStats { count: vec![1, 0, 2] };
        let b = CountStats { count: vec![0, 0, 5] };
        let totals = CountStats::totals(Family::Traffic, [&a, &b], 3);

        assert_eq!(totals, [NamedColumn::new("all_traffic_count", Values::Count(vec![1, 0, 7]))]);
    }

    #[test]
    fn totals_of_no_groups_are_zero() {
        let totals = CountStats::totals(Family::Transport, Vec::<&CountStats>::new(), 2);
        assert_eq!(totals[0].values, Values::Count(vec![0, 0]));
    }

    #[test]
    fn group_column_is_named_after_family() {
        let stats = CountStats::from_pairs(&[JoinPair { buffer: 1, feature: 0 }], 2);
        let columns = stats.columns(&Group::new("shop").unwrap(), Family::Pois);
        assert_eq!(columns.columns[0].name, "shop_pois_count");
        assert_eq!(columns.columns[0].values, Values::Count(vec![0, 1]));
    }
}

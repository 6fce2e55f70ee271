//! Per-buffer statistics computed from spatial join pairs.

mod area;
mod count;
mod length;

pub use area::AreaStats;
pub use count::CountStats;
pub use length::LengthStats;

use crate::{classify::Group, family::Family, join::JoinPair};

/// Number of matched features per buffer, zero for buffers without matches.
pub fn count_by_buffer(pairs: &[JoinPair], num_buffers: usize) -> Vec<u64> {
    let mut counts = vec![0u64; num_buffers];
    for pair in pairs {
        counts[pair.buffer] += 1;
    }
    counts
}

/// Sum of a per-feature value over matched features per buffer, zero for buffers without matches.
pub fn sum_by_buffer(pairs: &[JoinPair], num_buffers: usize, value: impl Fn(usize) -> f64) -> Vec<f64> {
    let mut sums = vec![0.0; num_buffers];
    for pair in pairs {
        sums[pair.buffer] += value(pair.feature);
    }
    sums
}

/// Output column name for a group statistic, e.g. `shop_pois_count`.
#[inline]
pub fn group_column(group: &Group, family: Family, stat: &str) -> String {
    format!("{group}_{family}_{stat}")
}

/// Output column name for a family total, e.g. `all_pois_count`.
#[inline]
pub fn total_column(family: Family, stat: &str) -> String {
    format!("{}_{family}_{stat}", Group::ALL)
}

/// `numerator / denominator`, defined as 0 when the denominator is 0.
#[inline]
pub(crate) fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(usize, usize)]) -> Vec<JoinPair> {
        raw.iter().map(|&(buffer, feature)| JoinPair { buffer, feature }).collect()
    }

    #[test]
    fn counts_zero_fill_missing_buffers() {
        assert_eq!(count_by_buffer(&pairs(&[(0, 0), (0, 1), (2, 1)]), 4), [2, 0, 1, 0]);
        assert_eq!(count_by_buffer(&[], 2), [0, 0]);
    }

    #[test]
    fn sums_use_feature_values() {
        let values = [1.5, 2.0, 4.0];
        let sums = sum_by_buffer(&pairs(&[(0, 0), (0, 2), (1, 2)]), 3, |f| values[f]);
        assert_eq!(sums, [5.5, 4.0, 0.0]);
    }

    #[test]
    fn column_names() {
        let group = Group::new("primary").unwrap();
        assert_eq!(group_column(&group, Family::Roads, "nearest-osmid"), "primary_roads_nearest-osmid");
        assert_eq!(total_column(Family::Buildings, "totalarea"), "all_buildings_totalarea");
    }

    #[test]
    fn ratio_of_zero_denominator() {
        assert_eq!(ratio_or_zero(0.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(3.0, 2.0), 1.5);
    }
}

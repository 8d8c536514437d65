use std::hash::Hash;

use indexmap::IndexMap;
use tracing::info;

use crate::models::stats::{AggregateResult, GroupStat};
use crate::models::vacancy::VacancyRecord;

/// Cities holding less than this share of all records (percent) are dropped.
pub const DEFAULT_MIN_CITY_SHARE_PCT: f64 = 1.0;

/// Running sums for one group before finalization.
#[derive(Debug, Default)]
struct GroupAccumulator {
    salary_sum: f64,
    count: usize,
}

impl GroupAccumulator {
    fn add(&mut self, midpoint: f64) {
        self.salary_sum += midpoint;
        self.count += 1;
    }

    fn finalize(&self) -> GroupStat {
        GroupStat {
            average_salary: truncated_mean(self.salary_sum, self.count),
            count: self.count,
        }
    }
}

/// Mean truncated toward zero. `count` is never zero for an existing group.
fn truncated_mean(sum: f64, count: usize) -> i64 {
    (sum / count as f64).trunc() as i64
}

fn add_to<K: Hash + Eq>(groups: &mut IndexMap<K, GroupAccumulator>, key: K, midpoint: f64) {
    groups.entry(key).or_default().add(midpoint);
}

fn finalize_all<K: Hash + Eq>(groups: IndexMap<K, GroupAccumulator>) -> IndexMap<K, GroupStat> {
    groups.into_iter().map(|(k, acc)| (k, acc.finalize())).collect()
}

/// Percentage of `total` that `count` represents. Zero when there are no records.
pub fn share_pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Aggregate with the default city threshold.
pub fn aggregate(records: &[VacancyRecord], target_title: &str) -> AggregateResult {
    aggregate_with_threshold(records, target_title, DEFAULT_MIN_CITY_SHARE_PCT)
}

/// One pass over `records` producing per-year, per-year-for-target and
/// per-city statistics.
///
/// A record counts toward the target grouping when `target_title` occurs in
/// its title (case-sensitive). An empty `target_title` matches nothing. Each record contributes its salary midpoint.
/// Cities whose share of all records is below `min_city_share_pct` are
/// removed after finalization.
pub fn aggregate_with_threshold(
    records: &[VacancyRecord],
    target_title: &str,
    min_city_share_pct: f64,
) -> AggregateResult {
    let mut by_year: IndexMap<i32, GroupAccumulator> = IndexMap::new();
    let mut by_year_for_target: IndexMap<i32, GroupAccumulator> = IndexMap::new();
    let mut by_city: IndexMap<String, GroupAccumulator> = IndexMap::new();

    for record in records {
        let midpoint = record.salary.midpoint();
        let year = record.year();

        add_to(&mut by_city, record.location.clone(), midpoint);
        add_to(&mut by_year, year, midpoint);
        if !target_title.is_empty() && record.title.contains(target_title) {
            add_to(&mut by_year_for_target, year, midpoint);
        }
    }

    let total_count = records.len();
    let city_count = by_city.len();
    let by_city: IndexMap<String, GroupStat> = finalize_all(by_city)
        .into_iter()
        .filter(|(_, stat)| share_pct(stat.count, total_count) >= min_city_share_pct)
        .collect();

    info!(
        "Aggregated {} records: {} years, {} target years, {}/{} cities kept",
        total_count,
        by_year.len(),
        by_year_for_target.len(),
        by_city.len(),
        city_count
    );

    AggregateResult {
        by_year: finalize_all(by_year),
        by_year_for_target: finalize_all(by_year_for_target),
        by_city,
        total_count,
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Finalized statistics for one group (a year or a city).
///
/// A group only exists once a record contributed to it, so `count >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStat {
    /// Mean of per-record salary midpoints, truncated toward zero.
    pub average_salary: i64,
    pub count: usize,
}

/// The three groupings produced by one pass over the records.
///
/// Maps keep the order in which each key was first seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    pub by_year: IndexMap<i32, GroupStat>,
    pub by_year_for_target: IndexMap<i32, GroupStat>,
    /// Cities at or above the share threshold only.
    pub by_city: IndexMap<String, GroupStat>,
    pub total_count: usize,
}

/// Everything the statistics sinks consume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub profession: String,
    pub salaries_by_year: IndexMap<i32, i64>,
    pub counts_by_year: IndexMap<i32, usize>,
    pub salaries_by_year_for_target: IndexMap<i32, i64>,
    pub counts_by_year_for_target: IndexMap<i32, usize>,
    /// Top cities by mean salary, descending.
    pub top_cities_by_salary: IndexMap<String, i64>,
    /// Top cities by share of all records, descending. Values are fractions.
    pub top_cities_by_share: IndexMap<String, f64>,
}

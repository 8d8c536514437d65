use indexmap::IndexMap;

use crate::models::config::StatsConfig;
use crate::models::stats::{AggregateResult, GroupStat, StatisticsReport};

/// Top `n` cities by mean salary, descending. Ties keep input order.
pub fn top_cities_by_salary(by_city: &IndexMap<String, GroupStat>, n: usize) -> IndexMap<String, i64> {
    let mut cities: Vec<(&String, &GroupStat)> = by_city.iter().collect();
    cities.sort_by(|a, b| b.1.average_salary.cmp(&a.1.average_salary));
    cities
        .into_iter()
        .take(n)
        .map(|(city, stat)| (city.clone(), stat.average_salary))
        .collect()
}

/// Top `n` cities by record count, descending, as a fraction of `total`
/// rounded to `precision` decimals. Ties keep input order.
pub fn top_cities_by_share(
    by_city: &IndexMap<String, GroupStat>,
    total: usize,
    n: usize,
    precision: u32,
) -> IndexMap<String, f64> {
    let mut cities: Vec<(&String, &GroupStat)> = by_city.iter().collect();
    cities.sort_by(|a, b| b.1.count.cmp(&a.1.count));
    cities
        .into_iter()
        .take(n)
        .map(|(city, stat)| (city.clone(), round_to(fraction(stat.count, total), precision)))
        .collect()
}

fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

// Formatting rounds the exact binary value with ties to even, so 1/32
// becomes 0.0312 rather than 0.0313.
fn round_to(value: f64, precision: u32) -> f64 {
    format!("{:.*}", precision as usize, value).parse().unwrap_or(value)
}

/// Assemble the report consumed by the console, JSON and CSV sinks.
pub fn build_report(result: &AggregateResult, config: &StatsConfig) -> StatisticsReport {
    StatisticsReport {
        profession: config.profession.clone(),
        salaries_by_year: result.by_year.iter().map(|(y, s)| (*y, s.average_salary)).collect(),
        counts_by_year: result.by_year.iter().map(|(y, s)| (*y, s.count)).collect(),
        salaries_by_year_for_target: result
            .by_year_for_target
            .iter()
            .map(|(y, s)| (*y, s.average_salary))
            .collect(),
        counts_by_year_for_target: result.by_year_for_target.iter().map(|(y, s)| (*y, s.count)).collect(),
        top_cities_by_salary: top_cities_by_salary(&result.by_city, config.top_n),
        top_cities_by_share: top_cities_by_share(
            &result.by_city,
            result.total_count,
            config.top_n,
            config.share_precision,
        ),
    }
}

use std::fmt::{Debug, Display, Write as FmtWrite};
use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;

use crate::engine::query::VacancyField;
use crate::errors::AppError;
use crate::models::stats::StatisticsReport;
use crate::models::vacancy::VacancyRecord;

/// Console text for a statistics run: one line per mapping, `{key: value, ...}`.
pub fn render_summary(report: &StatisticsReport) -> String {
    let lines = [
        ("Динамика уровня зарплат по годам", format_map(&report.salaries_by_year, plain_key, plain_value)),
        ("Динамика количества вакансий по годам", format_map(&report.counts_by_year, plain_key, plain_value)),
        (
            "Динамика уровня зарплат по годам для выбранной профессии",
            format_map(&report.salaries_by_year_for_target, plain_key, plain_value),
        ),
        (
            "Динамика количества вакансий по годам для выбранной профессии",
            format_map(&report.counts_by_year_for_target, plain_key, plain_value),
        ),
        (
            "Уровень зарплат по городам (в порядке убывания)",
            format_map(&report.top_cities_by_salary, quoted_key, plain_value),
        ),
        (
            "Доля вакансий по городам (в порядке убывания)",
            format_map(&report.top_cities_by_share, quoted_key, float_value),
        ),
    ];

    let mut out = String::new();
    for (title, values) in lines {
        writeln!(out, "{}: {}", title, values).ok();
    }
    out
}

fn plain_key<K: Display>(key: &K) -> String {
    key.to_string()
}

fn quoted_key<K: Display>(key: &K) -> String {
    format!("'{}'", key)
}

fn plain_value<V: Display>(value: &V) -> String {
    value.to_string()
}

// Debug keeps the trailing ".0" on whole fractions.
fn float_value<V: Debug>(value: &V) -> String {
    format!("{:?}", value)
}

fn format_map<K, V>(
    map: &IndexMap<K, V>,
    key: impl Fn(&K) -> String,
    value: impl Fn(&V) -> String,
) -> String {
    let parts: Vec<String> = map.iter().map(|(k, v)| format!("{}: {}", key(k), value(v))).collect();
    format!("{{{}}}", parts.join(", "))
}

/// Write the report as pretty JSON.
pub fn write_report_json(report: &StatisticsReport, path: &Path) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report)?;
    let mut file = std::fs::File::create(path)
        .map_err(|e| AppError::FileWrite(format!("не удалось создать JSON: {}", e)))?;
    file.write_all(json.as_bytes())
        .map_err(|e| AppError::FileWrite(e.to_string()))?;
    Ok(())
}

/// Write the report as a long-format CSV: `Section,Key,Value`.
pub fn write_report_csv(report: &StatisticsReport, path: &Path) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::FileWrite(format!("не удалось создать CSV: {}", e)))?;

    wtr.write_record(["Section", "Key", "Value"])
        .map_err(|e| AppError::FileWrite(e.to_string()))?;

    let mut rows: Vec<(&str, String, String)> = Vec::new();
    for (year, v) in &report.salaries_by_year {
        rows.push(("salary_by_year", year.to_string(), v.to_string()));
    }
    for (year, v) in &report.counts_by_year {
        rows.push(("count_by_year", year.to_string(), v.to_string()));
    }
    for (year, v) in &report.salaries_by_year_for_target {
        rows.push(("salary_by_year_for_target", year.to_string(), v.to_string()));
    }
    for (year, v) in &report.counts_by_year_for_target {
        rows.push(("count_by_year_for_target", year.to_string(), v.to_string()));
    }
    for (city, v) in &report.top_cities_by_salary {
        rows.push(("salary_by_city", city.clone(), v.to_string()));
    }
    for (city, v) in &report.top_cities_by_share {
        rows.push(("share_by_city", city.clone(), format!("{:?}", v)));
    }

    for (section, key, value) in &rows {
        wtr.write_record([*section, key.as_str(), value.as_str()])
            .map_err(|e| AppError::FileWrite(e.to_string()))?;
    }

    wtr.flush().map_err(|e| AppError::FileWrite(e.to_string()))?;
    Ok(())
}

/// Write records as a CSV table with a leading `№` column. `first_index` is
/// the number shown for the first row.
pub fn write_table_csv<W: Write>(
    writer: W,
    records: &[&VacancyRecord],
    fields: &[VacancyField],
    first_index: usize,
) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["№"];
    header.extend(fields.iter().map(|f| f.label()));
    wtr.write_record(&header)
        .map_err(|e| AppError::FileWrite(e.to_string()))?;

    for (i, record) in records.iter().enumerate() {
        let mut row = vec![(first_index + i).to_string()];
        row.extend(fields.iter().map(|f| f.display(record)));
        wtr.write_record(&row)
            .map_err(|e| AppError::FileWrite(e.to_string()))?;
    }

    wtr.flush().map_err(|e| AppError::FileWrite(e.to_string()))?;
    Ok(())
}

/// Console text for the oldest/newest publication lookup.
pub fn render_range(oldest: &VacancyRecord, newest: &VacancyRecord) -> String {
    format!(
        "Дата публикации самой старой вакансии: {}\nДата публикации самой новой вакансии: {}\n",
        oldest.published_at_display(),
        newest.published_at_display()
    )
}

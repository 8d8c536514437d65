use std::collections::HashMap;

use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use super::normalizer::normalize;
use super::reader::CsvTable;
use crate::errors::AppError;
use crate::models::currency::Currency;
use crate::models::experience::Experience;
use crate::models::vacancy::{SalaryRange, VacancyRecord};

/// Columns every export must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "name",
    "salary_from",
    "salary_to",
    "salary_currency",
    "area_name",
    "published_at",
];

/// Header names containing this marker belong to the salary sub-record.
const SALARY_MARKER: &str = "salary";

/// Build one record per data row.
///
/// Stops at the first row that cannot be built; an unknown currency code is
/// always fatal.
pub fn build_vacancies(table: &CsvTable) -> Result<Vec<VacancyRecord>, AppError> {
    check_columns(&table.header)?;

    let records = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| build_record(&table.header, row, i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Built {} vacancy records", records.len());
    Ok(records)
}

/// Fail with the first required column absent from `header`.
pub fn check_columns(header: &[String]) -> Result<(), AppError> {
    for column in REQUIRED_COLUMNS {
        if !header.iter().any(|h| h == column) {
            return Err(AppError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

/// Build a record from a header and one row. `row_number` is 1-based and only
/// used in error messages.
pub fn build_record(header: &[String], row: &[String], row_number: usize) -> Result<VacancyRecord, AppError> {
    let mut fields: HashMap<&str, String> = HashMap::new();
    let mut salary_fields: HashMap<&str, String> = HashMap::new();

    for (key, value) in header.iter().zip(row) {
        let target = if key.contains(SALARY_MARKER) { &mut salary_fields } else { &mut fields };
        target.insert(key.as_str(), normalize(value));
    }

    let salary = build_salary(&salary_fields, row_number)?;

    let published_raw = take(&mut fields, "published_at")?;
    let published_at = parse_published_at(&published_raw).map_err(|message| AppError::InvalidRow {
        row: row_number,
        message,
    })?;

    let mut record = VacancyRecord::new(
        take(&mut fields, "name")?,
        take(&mut fields, "area_name")?,
        salary,
        published_at,
    );

    record.description = fields.remove("description");
    record.employer_name = fields.remove("employer_name");
    record.experience = fields.remove("experience_id").map(|code| Experience::from_code(&code));
    if let Some(skills) = fields.remove("key_skills") {
        record.key_skills = skills.split('\n').map(str::to_string).collect();
    }
    if let Some(premium) = fields.remove("premium") {
        record.premium = Some(parse_flag(&premium).map_err(|message| AppError::InvalidRow {
            row: row_number,
            message: format!("premium: {}", message),
        })?);
    }

    Ok(record)
}

fn build_salary(fields: &HashMap<&str, String>, row_number: usize) -> Result<SalaryRange, AppError> {
    let amount = |key: &str| -> Result<f64, AppError> {
        let text = fields.get(key).ok_or_else(|| AppError::MissingColumn(key.to_string()))?;
        text.parse::<f64>().map_err(|_| AppError::InvalidRow {
            row: row_number,
            message: format!("{} не является числом: '{}'", key, text),
        })
    };

    let from = amount("salary_from")?;
    let to = amount("salary_to")?;

    let code = fields
        .get("salary_currency")
        .ok_or_else(|| AppError::MissingColumn("salary_currency".to_string()))?;
    let currency: Currency = code.parse().map_err(|_| AppError::UnknownCurrency {
        code: code.clone(),
        row: row_number,
    })?;

    let gross = match fields.get("salary_gross") {
        Some(text) => Some(parse_flag(text).map_err(|message| AppError::InvalidRow {
            row: row_number,
            message: format!("salary_gross: {}", message),
        })?),
        None => None,
    };

    Ok(SalaryRange::new(from, to, currency, gross))
}

fn take(fields: &mut HashMap<&str, String>, key: &str) -> Result<String, AppError> {
    fields.remove(key).ok_or_else(|| AppError::MissingColumn(key.to_string()))
}

fn parse_flag(text: &str) -> Result<bool, String> {
    match text {
        "True" | "true" | "TRUE" | "Да" => Ok(true),
        "False" | "false" | "FALSE" | "Нет" => Ok(false),
        other => Err(format!("ожидалось True/False, получено '{}'", other)),
    }
}

/// Parse a publication timestamp such as `2022-07-05T18:19:30+0300`.
///
/// The `T` becomes a space and the digits after `+` are read as a fraction of
/// a second (1 to 6 digits, right-padded to microseconds), not as a UTC offset.
pub fn parse_published_at(text: &str) -> Result<NaiveDateTime, String> {
    let spaced = text.replace('T', " ");
    let (main, fraction) = spaced
        .split_once('+')
        .ok_or_else(|| format!("в дате '{}' нет суффикса '+'", text))?;

    let base = NaiveDateTime::parse_from_str(main, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("некорректная дата '{}': {}", text, e))?;

    if fraction.is_empty() || fraction.len() > 6 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("некорректная доля секунды '{}' в дате '{}'", fraction, text));
    }
    let micros: u32 = format!("{:0<6}", fraction)
        .parse()
        .map_err(|_| format!("некорректная доля секунды '{}' в дате '{}'", fraction, text))?;

    base.with_nanosecond(micros * 1_000)
        .ok_or_else(|| format!("доля секунды вне диапазона в дате '{}'", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn basic_header() -> Vec<String> {
        header(&["name", "salary_from", "salary_to", "salary_currency", "area_name", "published_at"])
    }

    #[test]
    fn test_build_reference_record() {
        let r = build_record(
            &basic_header(),
            &row(&["A", "100", "200", "RUR", "Moscow", "2020-01-01T00:00:00+000000"]),
            1,
        )
        .unwrap();
        assert_eq!(r.title, "A");
        assert_eq!(r.location, "Moscow");
        assert_eq!(r.salary.from, 100.0);
        assert_eq!(r.salary.to, 200.0);
        assert_eq!(r.year(), 2020);
    }

    #[test]
    fn test_build_converts_currency() {
        let r = build_record(
            &basic_header(),
            &row(&["A", "10", "20", "EUR", "Berlin", "2021-03-01T12:00:00+0300"]),
            1,
        )
        .unwrap();
        assert!((r.salary.from - 599.0).abs() < 1e-9);
        assert!((r.salary.to - 1198.0).abs() < 1e-9);
        assert_eq!(r.salary.currency, Currency::Eur);
    }

    #[test]
    fn test_unknown_currency_is_fatal() {
        let err = build_record(
            &basic_header(),
            &row(&["A", "10", "20", "XYZ", "Moscow", "2021-03-01T12:00:00+0300"]),
            7,
        )
        .unwrap_err();
        match err {
            AppError::UnknownCurrency { code, row } => {
                assert_eq!(code, "XYZ");
                assert_eq!(row, 7);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_fields_are_normalized() {
        let r = build_record(
            &basic_header(),
            &row(&["<b>Rust</b>   dev", "1", "2", "RUR", " Санкт-Петербург ", "2020-01-01T00:00:00+0000"]),
            1,
        )
        .unwrap();
        assert_eq!(r.title, "Rust dev");
        assert_eq!(r.location, "Санкт-Петербург");
    }

    #[test]
    fn test_optional_columns() {
        let h = header(&[
            "name", "description", "key_skills", "experience_id", "premium", "employer_name",
            "salary_from", "salary_to", "salary_gross", "salary_currency", "area_name", "published_at",
        ]);
        let r = build_record(
            &h,
            &row(&[
                "Dev", "<p>Write   code</p>", "Rust\r\n SQL ", "between1And3", "False", "ACME",
                "100", "200", "True", "RUR", "Moscow", "2022-07-05T18:19:30+0300",
            ]),
            1,
        )
        .unwrap();
        assert_eq!(r.description.as_deref(), Some("Write code"));
        assert_eq!(r.key_skills, vec!["Rust", "SQL"]);
        assert_eq!(r.experience, Some(Experience::Between1And3));
        assert_eq!(r.premium, Some(false));
        assert_eq!(r.employer_name.as_deref(), Some("ACME"));
        assert_eq!(r.salary.gross, Some(true));
    }

    #[test]
    fn test_unknown_columns_ignored() {
        let mut h = basic_header();
        h.push("extra".to_string());
        let r = build_record(
            &h,
            &row(&["A", "1", "2", "RUR", "Moscow", "2020-01-01T00:00:00+0000", "whatever"]),
            1,
        );
        assert!(r.is_ok());
    }

    #[test]
    fn test_bad_salary_reports_row() {
        let err = build_record(
            &basic_header(),
            &row(&["A", "lots", "2", "RUR", "Moscow", "2020-01-01T00:00:00+0000"]),
            3,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidRow { row: 3, .. }));
    }

    #[test]
    fn test_missing_column() {
        let h = header(&["name", "salary_from", "salary_to", "salary_currency", "published_at"]);
        let table = CsvTable {
            header: h,
            rows: vec![row(&["A", "1", "2", "RUR", "2020-01-01T00:00:00+0000"])],
        };
        let err = build_vacancies(&table).unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(c) if c == "area_name"));
    }

    #[test]
    fn test_parse_published_at_fraction() {
        let t = parse_published_at("2022-07-05T18:19:30+0300").unwrap();
        assert_eq!(t.year(), 2022);
        assert_eq!(t.hour(), 18);
        // "0300" is a fraction of a second, not an offset
        assert_eq!(t.nanosecond(), 30_000_000);

        let t = parse_published_at("2020-01-01T00:00:00+000000").unwrap();
        assert_eq!(t.nanosecond(), 0);
    }

    #[test]
    fn test_parse_published_at_rejects_garbage() {
        assert!(parse_published_at("2022-07-05T18:19:30").is_err());
        assert!(parse_published_at("2022-07-05T18:19:30+1234567").is_err());
        assert!(parse_published_at("2022-07-05T18:19:30+ab").is_err());
        assert!(parse_published_at("05.07.2022 18:19:30+0300").is_err());
    }
}

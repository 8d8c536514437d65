use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::currency::Currency;
use crate::models::vacancy::VacancyRecord;

/// Fields a vacancy table can be filtered, sorted or projected by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacancyField {
    Name,
    Description,
    KeySkills,
    Experience,
    Premium,
    EmployerName,
    Salary,
    SalaryFrom,
    SalaryTo,
    SalaryGross,
    SalaryCurrency,
    AreaName,
    PublishedAt,
}

impl VacancyField {
    /// Table column order.
    pub const ALL: [VacancyField; 10] = [
        VacancyField::Name,
        VacancyField::Description,
        VacancyField::KeySkills,
        VacancyField::Experience,
        VacancyField::Premium,
        VacancyField::EmployerName,
        VacancyField::Salary,
        VacancyField::SalaryCurrency,
        VacancyField::AreaName,
        VacancyField::PublishedAt,
    ];

    /// Salary sub-fields that can be filtered and sorted by but are not table columns.
    pub const SALARY_PARTS: [VacancyField; 3] =
        [VacancyField::SalaryFrom, VacancyField::SalaryTo, VacancyField::SalaryGross];

    /// Column name in the source export.
    pub fn column(&self) -> &'static str {
        match self {
            VacancyField::Name => "name",
            VacancyField::Description => "description",
            VacancyField::KeySkills => "key_skills",
            VacancyField::Experience => "experience_id",
            VacancyField::Premium => "premium",
            VacancyField::EmployerName => "employer_name",
            VacancyField::Salary => "salary",
            VacancyField::SalaryFrom => "salary_from",
            VacancyField::SalaryTo => "salary_to",
            VacancyField::SalaryGross => "salary_gross",
            VacancyField::SalaryCurrency => "salary_currency",
            VacancyField::AreaName => "area_name",
            VacancyField::PublishedAt => "published_at",
        }
    }

    /// Label shown in table headers.
    pub fn label(&self) -> &'static str {
        match self {
            VacancyField::Name => "Название",
            VacancyField::Description => "Описание",
            VacancyField::KeySkills => "Навыки",
            VacancyField::Experience => "Опыт работы",
            VacancyField::Premium => "Премиум-вакансия",
            VacancyField::EmployerName => "Компания",
            VacancyField::Salary => "Оклад",
            VacancyField::SalaryFrom => "Нижняя граница вилки оклада",
            VacancyField::SalaryTo => "Верхняя граница вилки оклада",
            VacancyField::SalaryGross => "Оклад указан до вычета налогов",
            VacancyField::SalaryCurrency => "Идентификатор валюты оклада",
            VacancyField::AreaName => "Название региона",
            VacancyField::PublishedAt => "Дата публикации вакансии",
        }
    }

    /// Cell text for `record`.
    pub fn display(&self, record: &VacancyRecord) -> String {
        match self {
            VacancyField::Name => record.title.clone(),
            VacancyField::Description => record.description.clone().unwrap_or_default(),
            VacancyField::KeySkills => record.key_skills.join("\n"),
            VacancyField::Experience => record
                .experience
                .as_ref()
                .map(|e| e.display_name().to_string())
                .unwrap_or_default(),
            VacancyField::Premium => display_flag(record.premium),
            VacancyField::SalaryGross => display_flag(record.salary.gross),
            VacancyField::SalaryFrom => format_amount(record.salary.from),
            VacancyField::SalaryTo => format_amount(record.salary.to),
            VacancyField::EmployerName => record.employer_name.clone().unwrap_or_default(),
            // Bounds are stored converted.
            VacancyField::Salary => format!(
                "{} - {} ({})",
                format_amount(record.salary.from),
                format_amount(record.salary.to),
                Currency::REFERENCE.display_name()
            ),
            VacancyField::SalaryCurrency => record.salary.currency.code().to_string(),
            VacancyField::AreaName => record.location.clone(),
            VacancyField::PublishedAt => record.published_at_display(),
        }
    }

    /// Ordering of two records by this field.
    fn compare(&self, a: &VacancyRecord, b: &VacancyRecord) -> Ordering {
        match self {
            VacancyField::KeySkills => a.key_skills.len().cmp(&b.key_skills.len()),
            VacancyField::Experience => experience_rank(a).cmp(&experience_rank(b)),
            VacancyField::Premium => a.premium.cmp(&b.premium),
            VacancyField::SalaryGross => a.salary.gross.cmp(&b.salary.gross),
            VacancyField::SalaryFrom => a.salary.from.partial_cmp(&b.salary.from).unwrap_or(Ordering::Equal),
            VacancyField::SalaryTo => a.salary.to.partial_cmp(&b.salary.to).unwrap_or(Ordering::Equal),
            VacancyField::Salary => a
                .salary
                .midpoint()
                .partial_cmp(&b.salary.midpoint())
                .unwrap_or(Ordering::Equal),
            VacancyField::PublishedAt => a.published_at.cmp(&b.published_at),
            _ => self.display(a).cmp(&self.display(b)),
        }
    }

    /// Whether `record` matches `value` for this field.
    fn matches(&self, record: &VacancyRecord, value: &str) -> Result<bool, AppError> {
        Ok(match self {
            VacancyField::Salary => record.salary.contains(parse_amount(value)?),
            VacancyField::SalaryFrom => record.salary.from == parse_amount(value)?,
            VacancyField::SalaryTo => record.salary.to == parse_amount(value)?,
            VacancyField::KeySkills => value
                .split(", ")
                .all(|skill| record.key_skills.iter().any(|s| s == skill)),
            VacancyField::Experience => record.experience.as_ref().is_some_and(|e| e.matches(value)),
            VacancyField::SalaryCurrency => record.salary.currency.matches(value),
            VacancyField::Premium => record.premium == Some(parse_flag(self, value)?),
            VacancyField::SalaryGross => record.salary.gross == Some(parse_flag(self, value)?),
            _ => self.display(record) == value,
        })
    }
}

impl std::fmt::Display for VacancyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl std::str::FromStr for VacancyField {
    type Err = AppError;

    /// Accepts the column name (`area_name`) or the label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        VacancyField::ALL
            .into_iter()
            .chain(VacancyField::SALARY_PARTS)
            .find(|f| f.column() == s || f.label() == s)
            .ok_or_else(|| AppError::InvalidField(s.to_string()))
    }
}

fn display_flag(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "Да".to_string(),
        Some(false) => "Нет".to_string(),
        None => String::new(),
    }
}

fn parse_flag(field: &VacancyField, value: &str) -> Result<bool, AppError> {
    match value.to_lowercase().as_str() {
        "true" | "да" => Ok(true),
        "false" | "нет" => Ok(false),
        _ => Err(AppError::InvalidFilter(format!(
            "для {} ожидалось Да/Нет, получено '{}'",
            field.column(),
            value
        ))),
    }
}

fn parse_amount(value: &str) -> Result<f64, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidFilter(format!("оклад должен быть числом, получено '{}'", value)))
}

fn experience_rank(record: &VacancyRecord) -> u8 {
    record.experience.as_ref().map(|e| e.ordinal()).unwrap_or(u8::MAX)
}

/// Whole amount with space-separated thousands, e.g. `60 660`.
fn format_amount(amount: f64) -> String {
    let whole = amount.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// A `field: value` filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: VacancyField,
    pub value: String,
}

impl FieldFilter {
    /// Parse `"field: value"`. An empty string means "no filter".
    pub fn parse(text: &str) -> Result<Option<Self>, AppError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let (name, value) = text
            .split_once(": ")
            .ok_or_else(|| AppError::InvalidFilter(format!("ожидался формат 'поле: значение', получено '{}'", text)))?;
        Ok(Some(FieldFilter {
            field: name.parse()?,
            value: value.to_string(),
        }))
    }

    pub fn matches(&self, record: &VacancyRecord) -> Result<bool, AppError> {
        self.field.matches(record, &self.value)
    }
}

/// How to order records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortSpec {
    pub field: VacancyField,
    pub reverse: bool,
}

/// Filter then sort `records`. Sorting is stable in both directions.
pub fn select<'a>(
    records: &'a [VacancyRecord],
    filter: Option<&FieldFilter>,
    sort: Option<SortSpec>,
) -> Result<Vec<&'a VacancyRecord>, AppError> {
    let mut selected = Vec::with_capacity(records.len());
    for record in records {
        let keep = match filter {
            Some(f) => f.matches(record)?,
            None => true,
        };
        if keep {
            selected.push(record);
        }
    }

    if let Some(spec) = sort {
        selected.sort_by(|a, b| {
            let ord = spec.field.compare(a, b);
            if spec.reverse {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    Ok(selected)
}

/// Slice of rows to show: `start` is 1-based inclusive, `end` exclusive.
pub fn window<T>(rows: &[T], start: Option<usize>, end: Option<usize>) -> Result<&[T], AppError> {
    let from = match start {
        Some(0) => return Err(AppError::InvalidRange("нумерация строк начинается с 1".to_string())),
        Some(s) => s - 1,
        None => 0,
    };
    let to = end.map(|e| e.saturating_sub(1)).unwrap_or(rows.len()).min(rows.len());
    if from >= to {
        return Ok(&[]);
    }
    Ok(&rows[from..to])
}

/// Oldest and newest records by publication time. The first record wins ties.
pub fn publication_range(records: &[VacancyRecord]) -> Option<(&VacancyRecord, &VacancyRecord)> {
    let first = records.first()?;
    let mut oldest = first;
    let mut newest = first;
    for record in &records[1..] {
        if record.published_at < oldest.published_at {
            oldest = record;
        }
        if record.published_at > newest.published_at {
            newest = record;
        }
    }
    Some((oldest, newest))
}

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::currency::Currency;
use super::experience::Experience;

/// Posted compensation band.
///
/// `from` and `to` are always in the reference currency; conversion happens
/// once, in [`SalaryRange::new`]. `currency` is the code from the source row
/// and is kept for display and filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub from: f64,
    pub to: f64,
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross: Option<bool>,
}

impl SalaryRange {
    /// Build a range from raw bounds in `currency`.
    pub fn new(from: f64, to: f64, currency: Currency, gross: Option<bool>) -> Self {
        Self {
            from: currency.convert_to_reference(from),
            to: currency.convert_to_reference(to),
            currency,
            gross,
        }
    }

    /// Arithmetic mean of the two bounds.
    pub fn midpoint(&self) -> f64 {
        (self.from + self.to) / 2.0
    }

    /// Whether `amount` falls inside the band, bounds included.
    pub fn contains(&self, amount: f64) -> bool {
        self.from <= amount && amount <= self.to
    }
}

/// One job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacancyRecord {
    pub title: String,
    pub location: String,
    pub salary: SalaryRange,
    pub published_at: NaiveDateTime,

    // Columns only some exports carry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub key_skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Experience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
}

impl VacancyRecord {
    pub fn new(title: String, location: String, salary: SalaryRange, published_at: NaiveDateTime) -> Self {
        Self {
            title,
            location,
            salary,
            published_at,
            description: None,
            key_skills: Vec::new(),
            experience: None,
            premium: None,
            employer_name: None,
        }
    }

    pub fn year(&self) -> i32 {
        self.published_at.year()
    }

    /// Publication time as text; the fraction is shown only when non-zero.
    pub fn published_at_display(&self) -> String {
        if self.published_at.nanosecond() == 0 {
            self.published_at.format("%Y-%m-%d %H:%M:%S").to_string()
        } else {
            self.published_at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(10, 30, 0).unwrap()
    }

    #[test]
    fn test_reference_salary_unchanged() {
        let s = SalaryRange::new(100.0, 200.0, Currency::Rur, None);
        assert_eq!(s.from, 100.0);
        assert_eq!(s.to, 200.0);
        assert_eq!(s.currency, Currency::Rur);
    }

    #[test]
    fn test_foreign_salary_converted_once() {
        let s = SalaryRange::new(1000.0, 2000.0, Currency::Usd, Some(true));
        assert!((s.from - 60660.0).abs() < 1e-6);
        assert!((s.to - 121320.0).abs() < 1e-6);
        // Currency retained for display only
        assert_eq!(s.currency, Currency::Usd);
    }

    #[test]
    fn test_conversion_deterministic() {
        let a = SalaryRange::new(777.7, 888.8, Currency::Uzs, None);
        let b = SalaryRange::new(777.7, 888.8, Currency::Uzs, None);
        assert_eq!(a.from.to_bits(), b.from.to_bits());
        assert_eq!(a.to.to_bits(), b.to.to_bits());
    }

    #[test]
    fn test_midpoint_and_contains() {
        let s = SalaryRange::new(100.0, 300.0, Currency::Rur, None);
        assert_eq!(s.midpoint(), 200.0);
        assert!(s.contains(100.0));
        assert!(s.contains(300.0));
        assert!(!s.contains(300.5));
    }

    #[test]
    fn test_published_display() {
        let salary = SalaryRange::new(0.0, 0.0, Currency::Rur, None);
        let mut v = VacancyRecord::new("A".into(), "B".into(), salary, ts(2022, 7, 5));
        assert_eq!(v.year(), 2022);
        assert_eq!(v.published_at_display(), "2022-07-05 10:30:00");

        v.published_at = v.published_at.with_nanosecond(30_000_000).unwrap();
        assert_eq!(v.published_at_display(), "2022-07-05 10:30:00.030000");
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Settings for a statistics run. Loadable from JSON; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Title substring selecting the target profession (case-sensitive).
    pub profession: String,
    /// Number of cities kept in each ranking.
    pub top_n: usize,
    /// Cities below this share of all records (in percent) are dropped.
    pub min_city_share_pct: f64,
    /// Decimal places kept for city shares.
    pub share_precision: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            profession: String::new(),
            top_n: 10,
            min_city_share_pct: 1.0,
            share_precision: 4,
        }
    }
}

impl StatsConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    ///
    /// Not validated here: command-line overrides may still fill in fields,
    /// so call [`StatsConfig::validate`] once they are applied.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| AppError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        // Every title contains the empty string.
        if self.profession.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "не указана профессия (--profession или \"profession\" в файле настроек)".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(AppError::InvalidConfig("top_n должно быть не меньше 1".to_string()));
        }
        if !self.min_city_share_pct.is_finite() || self.min_city_share_pct < 0.0 {
            return Err(AppError::InvalidConfig(format!(
                "min_city_share_pct должно быть неотрицательным числом, получено {}",
                self.min_city_share_pct
            )));
        }
        if self.share_precision > 10 {
            return Err(AppError::InvalidConfig(format!(
                "слишком большое share_precision: {}",
                self.share_precision
            )));
        }
        Ok(())
    }
}

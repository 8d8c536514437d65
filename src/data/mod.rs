pub mod builder;
pub mod dataset;
pub mod normalizer;
pub mod reader;
pub mod splitter;

use std::path::Path;

use tracing::info;

pub use dataset::Dataset;

use crate::errors::AppError;
use crate::models::vacancy::VacancyRecord;

/// Read a vacancy export and build its records.
pub fn load_vacancies(path: &Path) -> Result<Dataset<Vec<VacancyRecord>>, AppError> {
    let dataset = reader::read_csv(path)?.try_map(|table| builder::build_vacancies(&table))?;
    if let Dataset::Ready(records) = &dataset {
        info!("Loaded {} vacancies from {}", records.len(), path.display());
    }
    Ok(dataset)
}

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use super::aggregator::aggregate_with_threshold;
use super::ranking::build_report;
use crate::data::{load_vacancies, Dataset};
use crate::errors::AppError;
use crate::models::config::StatsConfig;
use crate::models::stats::StatisticsReport;

/// Result of processing one file.
#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum FileOutcome {
    Report(StatisticsReport),
    EmptyFile,
    NoData,
    Failed(AppError),
}

#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Run the statistics pipeline on a single file.
pub fn run_stats(path: &Path, config: &StatsConfig) -> Result<Dataset<StatisticsReport>, AppError> {
    let dataset = load_vacancies(path)?;
    Ok(dataset.map(|records| {
        let result = aggregate_with_threshold(&records, &config.profession, config.min_city_share_pct);
        build_report(&result, config)
    }))
}

/// Process every file independently on the rayon pool.
///
/// Files share nothing and results are not merged; a failure in one file does
/// not affect the others. Outcomes come back in input order.
pub fn run_batch(paths: &[PathBuf], config: &StatsConfig) -> Vec<BatchOutcome> {
    info!("Batch: {} files", paths.len());
    let start = Instant::now();

    let outcomes: Vec<BatchOutcome> = paths
        .par_iter()
        .map(|path| {
            let outcome = match run_stats(path, config) {
                Ok(Dataset::Ready(report)) => FileOutcome::Report(report),
                Ok(Dataset::EmptyFile) => FileOutcome::EmptyFile,
                Ok(Dataset::NoData) => FileOutcome::NoData,
                Err(e) => {
                    warn!("{}: {}", path.display(), e);
                    FileOutcome::Failed(e)
                }
            };
            BatchOutcome {
                path: path.clone(),
                outcome,
            }
        })
        .collect();

    info!(
        "Batch complete: {} files in {:.1}s",
        outcomes.len(),
        start.elapsed().as_secs_f64()
    );
    outcomes
}

/// Expand directories into their `*.csv` entries (sorted by name); files pass through.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, AppError> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
                .collect();
            entries.sort();
            inputs.extend(entries);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,salary_from,salary_to,salary_currency,area_name,published_at\n";

    #[test]
    fn test_batch_keeps_files_independent() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("2020.csv");
        std::fs::write(
            &good,
            format!("{}Analyst,100,200,RUR,Moscow,2020-01-01T00:00:00+0000\n", HEADER),
        )
        .unwrap();
        let empty = dir.path().join("2021.csv");
        std::fs::write(&empty, "").unwrap();
        let header_only = dir.path().join("2022.csv");
        std::fs::write(&header_only, HEADER).unwrap();
        let bad = dir.path().join("2023.csv");
        std::fs::write(
            &bad,
            format!("{}Analyst,100,200,XXX,Moscow,2023-01-01T00:00:00+0000\n", HEADER),
        )
        .unwrap();

        let inputs = collect_inputs(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(inputs, vec![good.clone(), empty.clone(), header_only.clone(), bad.clone()]);

        let config = StatsConfig { profession: "Analyst".to_string(), ..StatsConfig::default() };
        let outcomes = run_batch(&inputs, &config);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].path, good);
        match &outcomes[0].outcome {
            FileOutcome::Report(r) => {
                assert_eq!(r.salaries_by_year[&2020], 150);
                assert_eq!(r.counts_by_year_for_target[&2020], 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(matches!(outcomes[1].outcome, FileOutcome::EmptyFile));
        assert!(matches!(outcomes[2].outcome, FileOutcome::NoData));
        assert!(matches!(outcomes[3].outcome, FileOutcome::Failed(AppError::UnknownCurrency { .. })));
    }

    #[test]
    fn test_outcome_serializes_with_status() {
        let outcome = BatchOutcome {
            path: PathBuf::from("x.csv"),
            outcome: FileOutcome::NoData,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"]["status"], "no_data");
    }
}

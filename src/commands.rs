use std::io::Write;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cli::{BatchArgs, Commands, StatsArgs, StatsOptions, VacanciesArgs};
use crate::data::{load_vacancies, splitter, Dataset};
use crate::engine::batch::{self, FileOutcome};
use crate::engine::query::{self, FieldFilter, SortSpec, VacancyField};
use crate::errors::AppError;
use crate::models::config::StatsConfig;
use crate::utils::export;

/// Dispatch a parsed command. Everything meant for the user goes to `out`.
pub fn execute(command: Commands, out: &mut impl Write) -> Result<(), AppError> {
    match command {
        Commands::Stats(args) => stats(args, out),
        Commands::Vacancies(args) => vacancies(args, out),
        Commands::Split { file, out_dir } => split(&file, &out_dir, out),
        Commands::Range { file } => range(&file, out),
        Commands::Batch(args) => run_batch(args, out),
    }
}

// ── Statistics ──

/// Resolve settings: config file first, then command-line overrides.
pub fn resolve_config(options: &StatsOptions) -> Result<StatsConfig, AppError> {
    let mut config = match &options.config {
        Some(path) => StatsConfig::from_json_file(path)?,
        None => StatsConfig::default(),
    };
    if let Some(profession) = &options.profession {
        config.profession = profession.clone();
    }
    if let Some(top) = options.top {
        config.top_n = top;
    }
    if let Some(share) = options.min_city_share {
        config.min_city_share_pct = share;
    }
    config.validate()?;
    Ok(config)
}

/// Run the pipeline on one file and print the six mappings.
pub fn stats(args: StatsArgs, out: &mut impl Write) -> Result<(), AppError> {
    let config = resolve_config(&args.options)?;
    info!("Statistics for {} (profession '{}')", args.file.display(), config.profession);

    let report = match batch::run_stats(&args.file, &config)? {
        Dataset::Ready(report) => report,
        other => return print_condition(&other, out),
    };

    emit(out, &export::render_summary(&report))?;

    if let Some(path) = &args.json {
        export::write_report_json(&report, path)?;
        info!("Report written to {}", path.display());
    }
    if let Some(path) = &args.csv {
        export::write_report_csv(&report, path)?;
        info!("Report written to {}", path.display());
    }
    Ok(())
}

fn run_batch(args: BatchArgs, out: &mut impl Write) -> Result<(), AppError> {
    let config = resolve_config(&args.options)?;
    let inputs = batch::collect_inputs(&args.paths)?;
    let outcomes = batch::run_batch(&inputs, &config);

    if let Some(dir) = &args.json_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::FileWrite(format!("не удалось создать {}: {}", dir.display(), e)))?;
    }
    let summary_names = summary_file_names(&inputs);

    for (outcome, name) in outcomes.iter().zip(&summary_names) {
        emit(out, &format!("== {}\n", outcome.path.display()))?;
        match &outcome.outcome {
            FileOutcome::Report(report) => emit(out, &export::render_summary(report))?,
            FileOutcome::EmptyFile => emit(out, "Пустой файл\n")?,
            FileOutcome::NoData => emit(out, "Нет данных\n")?,
            FileOutcome::Failed(e) => emit(out, &format!("Ошибка: {}\n", e))?,
        }

        if let Some(dir) = &args.json_dir {
            let json = serde_json::to_string_pretty(outcome)?;
            std::fs::write(dir.join(name), json).map_err(|e| AppError::FileWrite(e.to_string()))?;
        }
    }
    Ok(())
}

/// One `<stem>.json` name per input. Inputs sharing a stem get `-2`, `-3`, ...
/// so no summary overwrites another.
fn summary_file_names(paths: &[PathBuf]) -> Vec<String> {
    let mut used = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "output".to_string());
            let mut name = format!("{}.json", stem);
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{}-{}.json", stem, n);
                n += 1;
            }
            if n > 2 {
                warn!("{} shares its name with another input, summary saved as {}", path.display(), name);
            }
            name
        })
        .collect()
}

// ── Vacancy table ──

fn vacancies(args: VacanciesArgs, out: &mut impl Write) -> Result<(), AppError> {
    // Validate user input before touching the file.
    let filter = FieldFilter::parse(args.filter.as_deref().unwrap_or(""))?;
    let sort = match &args.sort {
        Some(name) if !name.trim().is_empty() => Some(SortSpec {
            field: name.parse()?,
            reverse: args.reverse,
        }),
        _ => None,
    };
    let fields: Vec<VacancyField> = if args.columns.is_empty() {
        VacancyField::ALL.to_vec()
    } else {
        let requested = args
            .columns
            .iter()
            .map(|c| c.parse())
            .collect::<Result<Vec<VacancyField>, _>>()?;
        // Keep table order regardless of request order.
        VacancyField::ALL.into_iter().filter(|f| requested.contains(f)).collect()
    };

    let records = match load_vacancies(&args.file)? {
        Dataset::Ready(records) => records,
        other => return print_condition(&other, out),
    };

    let selected = query::select(&records, filter.as_ref(), sort)?;
    if selected.is_empty() {
        return emit(out, "Ничего не найдено\n");
    }
    let shown = query::window(&selected, args.start, args.end)?;
    let first_index = args.start.unwrap_or(1);
    info!("Showing {} of {} vacancies", shown.len(), selected.len());

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| AppError::FileWrite(format!("не удалось создать CSV: {}", e)))?;
            export::write_table_csv(file, shown, &fields, first_index)
        }
        None => export::write_table_csv(out, shown, &fields, first_index),
    }
}

// ── Split / Range ──

fn split(file: &Path, out_dir: &Path, out: &mut impl Write) -> Result<(), AppError> {
    let files = match splitter::split_by_year(file, out_dir)? {
        Dataset::Ready(files) => files,
        other => return print_condition(&other, out),
    };
    for f in &files {
        emit(out, &format!("{}: {} строк -> {}\n", f.year, f.rows, f.path.display()))?;
    }
    Ok(())
}

fn range(file: &Path, out: &mut impl Write) -> Result<(), AppError> {
    let records = match load_vacancies(file)? {
        Dataset::Ready(records) => records,
        other => return print_condition(&other, out),
    };
    match query::publication_range(&records) {
        Some((oldest, newest)) => emit(out, &export::render_range(oldest, newest)),
        None => print_condition(&Dataset::<()>::NoData, out),
    }
}

// ── Helpers ──

fn print_condition<T>(dataset: &Dataset<T>, out: &mut impl Write) -> Result<(), AppError> {
    if let Some(message) = dataset.message() {
        emit(out, &format!("{}\n", message))?;
    }
    Ok(())
}

fn emit(out: &mut impl Write, text: &str) -> Result<(), AppError> {
    out.write_all(text.as_bytes())
        .map_err(|e| AppError::FileWrite(format!("не удалось вывести результат: {}", e)))
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vacancy-stats")]
#[command(about = "Статистика зарплат по выгрузкам вакансий в CSV")]
#[command(version)]
pub struct Cli {
    /// Уровень логирования, если не задан RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Статистика зарплат по годам и городам
    Stats(StatsArgs),
    /// Таблица вакансий в CSV с фильтром и сортировкой
    Vacancies(VacanciesArgs),
    /// Разделить выгрузку на CSV-файлы по годам публикации
    Split {
        /// Выгрузка вакансий
        file: PathBuf,
        /// Каталог для файлов <год>.csv
        #[arg(long, short = 'o')]
        out_dir: PathBuf,
    },
    /// Даты публикации самой старой и самой новой вакансии
    Range {
        /// Выгрузка вакансий
        file: PathBuf,
    },
    /// Параллельный расчёт статистики по нескольким файлам
    Batch(BatchArgs),
}

/// Options shared by `stats` and `batch`.
#[derive(Debug, Clone, Args)]
pub struct StatsOptions {
    /// Часть названия вакансии, задающая профессию
    #[arg(long, short = 'p')]
    pub profession: Option<String>,

    /// JSON-файл с настройками статистики
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Количество городов в каждом рейтинге
    #[arg(long)]
    pub top: Option<usize>,

    /// Минимальная доля города среди всех вакансий, в процентах
    #[arg(long)]
    pub min_city_share: Option<f64>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Выгрузка вакансий
    pub file: PathBuf,

    #[command(flatten)]
    pub options: StatsOptions,

    /// Дополнительно сохранить отчёт в JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Дополнительно сохранить отчёт в CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct VacanciesArgs {
    /// Выгрузка вакансий
    pub file: PathBuf,

    /// Фильтр вида "поле: значение", например "area_name: Москва"
    #[arg(long)]
    pub filter: Option<String>,

    /// Поле сортировки
    #[arg(long)]
    pub sort: Option<String>,

    /// Обратный порядок сортировки
    #[arg(long)]
    pub reverse: bool,

    /// Первая выводимая строка (с 1)
    #[arg(long)]
    pub start: Option<usize>,

    /// Строка, перед которой вывод заканчивается (с 1)
    #[arg(long)]
    pub end: Option<usize>,

    /// Выводимые столбцы через запятую (по умолчанию все)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Записать в файл вместо stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Файлы или каталоги (из каталогов берутся файлы *.csv)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub options: StatsOptions,

    /// Каталог для JSON-сводок по каждому входному файлу
    #[arg(long)]
    pub json_dir: Option<PathBuf>,
}

use std::path::{Path, PathBuf};

use chrono::Datelike;
use indexmap::IndexMap;
use tracing::info;

use super::builder::parse_published_at;
use super::dataset::Dataset;
use super::reader::{read_csv, CsvTable};
use crate::errors::AppError;

/// One file written by [`split_by_year`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFile {
    pub year: i32,
    pub path: PathBuf,
    pub rows: usize,
}

/// Split an export into `<out_dir>/<year>.csv`, one file per publication year.
///
/// Rows are written as read (no field cleanup), each file starting with the
/// header. Years appear in the order they are first seen.
pub fn split_by_year(path: &Path, out_dir: &Path) -> Result<Dataset<Vec<YearFile>>, AppError> {
    read_csv(path)?.try_map(|table| write_year_files(&table, out_dir))
}

/// Group rows of `table` by publication year.
pub fn group_rows_by_year(table: &CsvTable) -> Result<IndexMap<i32, Vec<&Vec<String>>>, AppError> {
    let column = table
        .column("published_at")
        .ok_or_else(|| AppError::MissingColumn("published_at".to_string()))?;

    let mut groups: IndexMap<i32, Vec<&Vec<String>>> = IndexMap::new();
    for (i, row) in table.rows.iter().enumerate() {
        let published = parse_published_at(&row[column])
            .map_err(|message| AppError::InvalidRow { row: i + 1, message })?;
        groups.entry(published.year()).or_default().push(row);
    }
    Ok(groups)
}

fn write_year_files(table: &CsvTable, out_dir: &Path) -> Result<Vec<YearFile>, AppError> {
    let groups = group_rows_by_year(table)?;
    std::fs::create_dir_all(out_dir)
        .map_err(|e| AppError::FileWrite(format!("не удалось создать {}: {}", out_dir.display(), e)))?;

    let mut written = Vec::with_capacity(groups.len());
    for (year, rows) in groups {
        let file_path = out_dir.join(format!("{}.csv", year));
        let mut wtr = csv::Writer::from_path(&file_path)
            .map_err(|e| AppError::FileWrite(format!("не удалось создать CSV: {}", e)))?;

        wtr.write_record(&table.header)
            .map_err(|e| AppError::FileWrite(e.to_string()))?;
        for row in &rows {
            wtr.write_record(row.iter())
                .map_err(|e| AppError::FileWrite(e.to_string()))?;
        }
        wtr.flush().map_err(|e| AppError::FileWrite(e.to_string()))?;

        info!("Wrote {} rows for {} to {}", rows.len(), year, file_path.display());
        written.push(YearFile {
            year,
            path: file_path,
            rows: rows.len(),
        });
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reader::parse_csv;

    const SAMPLE: &str = "name,salary_from,salary_to,salary_currency,area_name,published_at\n\
        A,1,2,RUR,Moscow,2021-01-01T00:00:00+0000\n\
        B,3,4,RUR,Kazan,2020-05-05T00:00:00+0000\n\
        C,5,6,USD,Moscow,2021-09-09T00:00:00+0000\n";

    #[test]
    fn test_group_rows_by_year_keeps_first_seen_order() {
        let table = parse_csv(SAMPLE).unwrap().ready().unwrap();
        let groups = group_rows_by_year(&table).unwrap();
        let years: Vec<i32> = groups.keys().copied().collect();
        assert_eq!(years, vec![2021, 2020]);
        assert_eq!(groups[&2021].len(), 2);
        assert_eq!(groups[&2020][0][0], "B");
    }

    #[test]
    fn test_split_writes_one_file_per_year() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("vacancies.csv");
        std::fs::write(&input, SAMPLE).unwrap();
        let out = dir.path().join("by_year");

        let files = split_by_year(&input, &out).unwrap().ready().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].year, 2021);
        assert_eq!(files[0].rows, 2);

        let text = std::fs::read_to_string(out.join("2020.csv")).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("name,salary_from,salary_to,salary_currency,area_name,published_at")
        );
        assert_eq!(lines.next(), Some("B,3,4,RUR,Kazan,2020-05-05T00:00:00+0000"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_split_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.csv");
        std::fs::write(&input, "").unwrap();
        let res = split_by_year(&input, &dir.path().join("out")).unwrap();
        assert_eq!(res, Dataset::EmptyFile);
    }
}

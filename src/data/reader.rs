use std::path::Path;

use tracing::debug;

use super::dataset::Dataset;
use crate::errors::AppError;

/// Header plus the rows that passed the well-formedness filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Position of a header name, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

/// Read a vacancy export from disk.
pub fn read_csv(path: &Path) -> Result<Dataset<CsvTable>, AppError> {
    let content = std::fs::read_to_string(path)?;
    let dataset = parse_csv(&content)?;
    if let Dataset::Ready(table) = &dataset {
        debug!(
            "Read {} rows x {} columns from {}",
            table.rows.len(),
            table.header.len(),
            path.display()
        );
    }
    Ok(dataset)
}

/// Parse export text.
///
/// The first line is the header: split on commas with no quoting, with any
/// CR, LF and byte-order mark removed. The remaining text is standard CSV
/// (quoted fields may span lines). A row is kept only when it has exactly as
/// many fields as the header and none of them is empty; other rows are dropped
/// without notice.
pub fn parse_csv(content: &str) -> Result<Dataset<CsvTable>, AppError> {
    if content.is_empty() {
        return Ok(Dataset::EmptyFile);
    }

    let (first_line, rest) = match content.find('\n') {
        Some(idx) => (&content[..idx], &content[idx + 1..]),
        None => (content, ""),
    };

    let header: Vec<String> = first_line
        .replace(['\r', '\n', '\u{feff}'], "")
        .split(',')
        .map(str::to_string)
        .collect();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rest.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() != header.len() || record.iter().any(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Ok(Dataset::NoData);
    }

    Ok(Dataset::Ready(CsvTable { header, rows }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(content: &str) -> CsvTable {
        parse_csv(content).unwrap().ready().expect("expected data")
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(parse_csv("").unwrap(), Dataset::EmptyFile);
    }

    #[test]
    fn test_header_only_is_no_data() {
        assert_eq!(parse_csv("name,area_name\n").unwrap(), Dataset::NoData);
        assert_eq!(parse_csv("name,area_name").unwrap(), Dataset::NoData);
    }

    #[test]
    fn test_all_rows_malformed_is_no_data() {
        let text = "a,b,c\n1,2\n1,,3\n1,2,3,4\n";
        assert_eq!(parse_csv(text).unwrap(), Dataset::NoData);
    }

    #[test]
    fn test_header_strips_bom_and_crlf() {
        let t = table("\u{feff}name,area_name\r\nDev,Moscow\r\n");
        assert_eq!(t.header, vec!["name", "area_name"]);
        assert_eq!(t.rows, vec![vec!["Dev".to_string(), "Moscow".to_string()]]);
    }

    #[test]
    fn test_drops_short_long_and_empty_rows() {
        let text = "a,b,c\n1,2,3\n4,5\n6,,7\n8,9,10,11\n12,13,14\n";
        let t = table(text);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec!["1", "2", "3"]);
        assert_eq!(t.rows[1], vec!["12", "13", "14"]);
    }

    #[test]
    fn test_quoted_fields_span_lines() {
        let text = "name,key_skills\nDev,\"Rust\nSQL\"\nQA,\"a, b\"\n";
        let t = table(text);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0][1], "Rust\nSQL");
        assert_eq!(t.rows[1][1], "a, b");
    }

    #[test]
    fn test_quoted_empty_field_dropped() {
        let t = table("a,b\n\"\",x\ny,z\n");
        assert_eq!(t.rows, vec![vec!["y".to_string(), "z".to_string()]]);
    }

    #[test]
    fn test_column_lookup() {
        let t = table("name,published_at\nA,2020-01-01T00:00:00+0000\n");
        assert_eq!(t.column("published_at"), Some(1));
        assert_eq!(t.column("missing"), None);
    }

    #[test]
    fn test_read_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.csv");
        std::fs::write(&path, "").unwrap();
        assert_eq!(read_csv(&path).unwrap(), Dataset::EmptyFile);

        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        assert_eq!(read_csv(&path).unwrap().ready().unwrap().rows.len(), 1);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = read_csv(&dir.path().join("nope.csv"));
        assert!(matches!(res, Err(AppError::FileNotFound(_))));
    }
}

//! Tabular input source
//!
//! Loads CSV files with a header row into an in-memory [`Table`]. Column
//! lookups are case-insensitive, matching how the spreadsheets these audits
//! start from tend to be hand-edited.

use crate::{ReportError, ReportResult};
use std::path::Path;

/// An input table: header row plus data records
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

/// One data row of a [`Table`], with case-insensitive column access
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> Row<'a> {
    /// Returns the value under the given column name, case-insensitively
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(column))
            .and_then(|index| self.values.get(index))
            .map(String::as_str)
    }
}

impl Table {
    /// Returns the header names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the number of data rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the data rows
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.records.iter().map(|values| Row {
            headers: &self.headers,
            values,
        })
    }

    /// Resolves a column name to its canonical header, case-insensitively
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The header exactly as it appears in the file
    /// * `Err(ReportError::ColumnNotFound)` - No header matches
    pub fn resolve_header(&self, column: &str) -> ReportResult<String> {
        self.headers
            .iter()
            .find(|header| header.eq_ignore_ascii_case(column))
            .cloned()
            .ok_or_else(|| ReportError::ColumnNotFound(column.to_string()))
    }

    /// Returns all non-blank values of a column, case-insensitive match
    ///
    /// Blank cells are dropped, mirroring how empty spreadsheet rows are
    /// skipped rather than audited.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Trimmed, non-empty cell values in row order
    /// * `Err(ReportError::ColumnNotFound)` - No header matches
    pub fn column(&self, column: &str) -> ReportResult<Vec<String>> {
        let canonical = self.resolve_header(column)?;

        Ok(self
            .rows()
            .filter_map(|row| row.get(&canonical))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Loads a CSV file with a header row into a [`Table`]
///
/// # Arguments
///
/// * `path` - Path to the CSV file
///
/// # Returns
///
/// * `Ok(Table)` - The parsed table
/// * `Err(ReportError::FileNotFound)` - The file does not exist
/// * `Err(ReportError::Csv)` - The file could not be parsed
pub fn load_rows(path: &Path) -> ReportResult<Table> {
    if !path.exists() {
        return Err(ReportError::FileNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut values: Vec<String> = record.iter().map(str::to_string).collect();
        // Short records pad out so every row has the full column shape
        values.resize(headers.len(), String::new());
        records.push(values);
    }

    Ok(Table { headers, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_rows_and_headers() {
        let file = write_csv("URL,Status\nhttps://a.com,ok\nhttps://b.com,bad\n");
        let table = load_rows(file.path()).unwrap();

        assert_eq!(table.headers(), &["URL".to_string(), "Status".to_string()]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let result = load_rows(Path::new("/nonexistent/input.csv"));
        assert!(matches!(result, Err(ReportError::FileNotFound(_))));
    }

    #[test]
    fn test_column_case_insensitive() {
        let file = write_csv("Url\nhttps://a.com\nhttps://b.com\n");
        let table = load_rows(file.path()).unwrap();

        let urls = table.column("URL").unwrap();
        assert_eq!(urls, vec!["https://a.com", "https://b.com"]);
    }

    #[test]
    fn test_column_not_found() {
        let file = write_csv("URL\nhttps://a.com\n");
        let table = load_rows(file.path()).unwrap();

        let result = table.column("Sitemap");
        assert!(matches!(result, Err(ReportError::ColumnNotFound(name)) if name == "Sitemap"));
    }

    #[test]
    fn test_column_skips_blank_cells() {
        let file = write_csv("URL,Other\nhttps://a.com,1\n  ,2\nhttps://c.com,3\n");
        let table = load_rows(file.path()).unwrap();

        let urls = table.column("url").unwrap();
        assert_eq!(urls, vec!["https://a.com", "https://c.com"]);
    }

    #[test]
    fn test_row_access() {
        let file = write_csv("URL,Meta Name,Expected Content\nhttps://a.com,description,hello\n");
        let table = load_rows(file.path()).unwrap();

        let row = table.rows().next().unwrap();
        assert_eq!(row.get("url"), Some("https://a.com"));
        assert_eq!(row.get("META NAME"), Some("description"));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_resolve_header_keeps_file_casing() {
        let file = write_csv("Expected URLS\nhttps://a.com\n");
        let table = load_rows(file.path()).unwrap();

        assert_eq!(table.resolve_header("expected urls").unwrap(), "Expected URLS");
    }

    #[test]
    fn test_short_records_are_padded() {
        let file = write_csv("A,B,C\n1,2\n");
        let table = load_rows(file.path()).unwrap();

        let row = table.rows().next().unwrap();
        assert_eq!(row.get("C"), Some(""));
    }
}

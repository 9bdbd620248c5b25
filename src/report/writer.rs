//! Tabular output sink
//!
//! Writes a batch of [`ReportRow`]s as one CSV table. The caller supplies
//! the column order; rows missing a column get an empty cell so the table
//! shape stays uniform.

use crate::report::ReportRow;
use crate::ReportResult;
use std::path::Path;

/// Writes rows as a CSV table at `destination`
///
/// Parent directories are created as needed (commands default to writing
/// under a `results/` directory that may not exist yet).
///
/// # Arguments
///
/// * `headers` - Column names, in output order
/// * `rows` - One mapping per completed task
/// * `destination` - Path of the CSV file to create or overwrite
pub fn write_table(
    headers: &[String],
    rows: &[ReportRow],
    destination: &Path,
) -> ReportResult<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(destination)?;
    writer.write_record(headers)?;

    for row in rows {
        let record: Vec<&str> = headers
            .iter()
            .map(|header| row.get(header).map(String::as_str).unwrap_or(""))
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    tracing::info!(
        "Wrote {} rows to {}",
        rows.len(),
        destination.display()
    );

    Ok(())
}

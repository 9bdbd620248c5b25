//! compare-metas command
//!
//! Audits meta tag content against expected values. Each input row names a
//! URL, a meta tag, and the content that tag is expected to carry; the
//! report adds what was actually found and whether it matches.

use crate::config::Config;
use crate::crawler::{Fetcher, MetaProber};
use crate::report::{self, ReportRow};
use crate::runner::{run_all, LogProgress};
use crate::Result;
use std::path::{Path, PathBuf};

/// Column with the content actually found on the page
pub const FOUND_CONTENT_COLUMN: &str = "Found Content";

/// Column with the comparison verdict
pub const MATCH_COLUMN: &str = "Match?";

/// Value written when the named tag (or its content attribute) is absent
pub const NOT_FOUND_MARKER: &str = "Not Found";

/// One audit unit: a URL, the meta tag to read, and the expected content
#[derive(Debug, Clone)]
struct CompareTask {
    url: String,
    meta_name: String,
    expected: String,
}

/// Resolved input column names, echoed into every report row
#[derive(Debug, Clone)]
struct Columns {
    url: String,
    name: String,
    content: String,
}

/// Runs the meta content comparison
///
/// # Arguments
///
/// * `config` - Crawler and output configuration
/// * `file_path` - Input table
/// * `url_col` - Column with the URLs to audit (case-insensitive)
/// * `name_col` - Column with the meta tag names
/// * `content_col` - Column with the expected content values
///
/// # Returns
///
/// The path of the written report.
pub async fn run(
    config: &Config,
    file_path: &Path,
    url_col: &str,
    name_col: &str,
    content_col: &str,
) -> Result<PathBuf> {
    let table = report::load_rows(file_path)?;

    let columns = Columns {
        url: table.resolve_header(url_col)?,
        name: table.resolve_header(name_col)?,
        content: table.resolve_header(content_col)?,
    };

    // Rows without a URL are dropped rather than audited
    let tasks: Vec<CompareTask> = table
        .rows()
        .filter_map(|row| {
            let url = row.get(&columns.url)?.trim();
            if url.is_empty() {
                return None;
            }
            Some(CompareTask {
                url: url.to_string(),
                meta_name: row.get(&columns.name).unwrap_or("").trim().to_string(),
                expected: row.get(&columns.content).unwrap_or("").trim().to_string(),
            })
        })
        .collect();

    tracing::info!("Comparing meta content for {} URLs", tasks.len());

    let fetcher = Fetcher::new(&config.crawler)?;
    let mut observer = LogProgress;

    let worker_columns = columns.clone();
    let rows = run_all(
        tasks,
        fetcher,
        config.crawler.max_workers,
        move |task, fetcher| process_row(task, fetcher, worker_columns.clone()),
        |task| task.url.clone(),
        &mut observer,
    )
    .await;

    let headers = vec![
        columns.url,
        columns.name,
        columns.content,
        FOUND_CONTENT_COLUMN.to_string(),
        MATCH_COLUMN.to_string(),
    ];

    let destination = Path::new(&config.output.results_dir).join("compare_metas_results.csv");
    report::write_table(&headers, &rows, &destination)?;

    Ok(destination)
}

/// Audits one row, catching its own failures
///
/// The input values are echoed back so results can be correlated despite
/// completion-order collection.
async fn process_row(task: CompareTask, fetcher: Fetcher, columns: Columns) -> ReportRow {
    let mut row = ReportRow::new();
    row.insert(columns.url, task.url.clone());
    row.insert(columns.name, task.meta_name.clone());
    row.insert(columns.content, task.expected.clone());

    match fetcher.fetch_text(&task.url).await {
        Ok(html) => {
            let mut prober = MetaProber::new(html);
            let found = prober.tag_content(&task.meta_name);
            let is_match = found
                .as_deref()
                .map(|content| content.trim() == task.expected)
                .unwrap_or(false);

            row.insert(
                FOUND_CONTENT_COLUMN.to_string(),
                found.unwrap_or_else(|| NOT_FOUND_MARKER.to_string()),
            );
            row.insert(MATCH_COLUMN.to_string(), is_match.to_string());
        }
        Err(e) => {
            tracing::error!("Error processing URL {}: {}", task.url, e);
            row.insert(FOUND_CONTENT_COLUMN.to_string(), format!("Error: {}", e));
            row.insert(MATCH_COLUMN.to_string(), false.to_string());
        }
    }

    row
}

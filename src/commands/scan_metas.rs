//! scan-metas command
//!
//! Reads a column of URLs from an input table and probes every URL for a
//! list of named meta tags, concurrently. The report carries one boolean
//! column per check; a URL whose fetch fails gets the error marker in every
//! check column instead.

use crate::config::Config;
use crate::crawler::{CheckOutcome, CrawlTarget, Fetcher, MetaProber};
use crate::report::{self, ReportRow};
use crate::runner::{run_all, LogProgress};
use crate::Result;
use std::path::{Path, PathBuf};

/// Column carrying the audited URL in the output report
pub const URL_COLUMN: &str = "URL";

/// Value written for checks that could not be performed
pub const ERROR_MARKER: &str = "Error";

/// Runs the meta tag scan
///
/// # Arguments
///
/// * `config` - Crawler and output configuration
/// * `file_path` - Input table with the URLs to audit
/// * `column_name` - Name of the URL column (case-insensitive)
/// * `checks` - Meta tag names to probe for existence
///
/// # Returns
///
/// The path of the written report.
pub async fn run(
    config: &Config,
    file_path: &Path,
    column_name: &str,
    checks: &[String],
) -> Result<PathBuf> {
    let table = report::load_rows(file_path)?;
    let urls = table.column(column_name)?;

    tracing::info!(
        "Scanning {} URLs for {} meta tag(s)",
        urls.len(),
        checks.len()
    );

    let fetcher = Fetcher::new(&config.crawler)?;
    let targets: Vec<CrawlTarget> = urls
        .into_iter()
        .map(|url| CrawlTarget::new(url, checks.to_vec()))
        .collect();

    let mut observer = LogProgress;
    let rows = run_all(
        targets,
        fetcher,
        config.crawler.max_workers,
        process_target,
        |target| target.url.clone(),
        &mut observer,
    )
    .await;

    let mut headers = vec![URL_COLUMN.to_string()];
    headers.extend(checks.iter().cloned());

    let destination = Path::new(&config.output.results_dir).join("scan_metas_results.csv");
    report::write_table(&headers, &rows, &destination)?;

    Ok(destination)
}

/// Probes one URL for its named meta tags
///
/// Catches its own fetch failure and marks every check column, so the batch
/// never loses the row.
async fn process_target(target: CrawlTarget, fetcher: Fetcher) -> ReportRow {
    let mut row = ReportRow::new();
    row.insert(URL_COLUMN.to_string(), target.url.clone());

    match fetcher.fetch_text(&target.url).await {
        Ok(html) => {
            let mut prober = MetaProber::new(html);
            for (check, outcome) in prober.scan(&target.checks) {
                let value = match outcome {
                    CheckOutcome::Found(found) => found.to_string(),
                    _ => ERROR_MARKER.to_string(),
                };
                row.insert(check, value);
            }
        }
        Err(e) => {
            tracing::error!("'{}' generated an error: {}", target.url, e);
            for check in &target.checks {
                row.insert(check.clone(), ERROR_MARKER.to_string());
            }
        }
    }

    row
}

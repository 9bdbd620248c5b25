//! sitemap-check command
//!
//! Resolves a sitemap (recursively, through any index levels) and audits a
//! column of expected URLs against the resolved set. Resolution happens once
//! up front; the per-row membership checks run through the task runner but
//! perform no network operations.

use crate::config::Config;
use crate::crawler::{self, Fetcher};
use crate::report::{self, ReportRow};
use crate::runner::{run_all, LogProgress};
use crate::{ReportError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Column with the membership verdict
pub const FOUND_COLUMN: &str = "Found in Sitemap?";

/// Runs the sitemap coverage check
///
/// # Arguments
///
/// * `config` - Crawler and output configuration
/// * `file_path` - Input table
/// * `sitemap_col` - Column whose first value is the root sitemap URL
/// * `urls_col` - Column with the URLs expected to appear in the sitemap
///
/// # Returns
///
/// The path of the written report. A root sitemap fetch failure aborts this
/// command with a [`crate::ResolveError`].
pub async fn run(
    config: &Config,
    file_path: &Path,
    sitemap_col: &str,
    urls_col: &str,
) -> Result<PathBuf> {
    let table = report::load_rows(file_path)?;

    let sitemap_url = table
        .column(sitemap_col)?
        .into_iter()
        .next()
        .ok_or_else(|| ReportError::EmptyColumn(sitemap_col.to_string()))?;
    url::Url::parse(&sitemap_url)?;

    let urls_header = table.resolve_header(urls_col)?;
    let expected_urls = table.column(&urls_header)?;

    let fetcher = Fetcher::new(&config.crawler)?;
    tracing::info!("Resolving sitemap {}", sitemap_url);
    let sitemap_urls = Arc::new(crawler::resolve(&fetcher, &sitemap_url).await?);
    tracing::info!("Sitemap resolved: {} unique URLs found", sitemap_urls.len());

    let mut observer = LogProgress;
    let header = urls_header.clone();
    let rows = run_all(
        expected_urls,
        sitemap_urls,
        config.crawler.max_workers,
        move |url, sitemap_urls| check_membership(url, sitemap_urls, header.clone()),
        |url| url.clone(),
        &mut observer,
    )
    .await;

    let headers = vec![urls_header, FOUND_COLUMN.to_string()];
    let destination = Path::new(&config.output.results_dir).join("sitemap_check_results.csv");
    report::write_table(&headers, &rows, &destination)?;

    Ok(destination)
}

/// Checks one expected URL against the resolved sitemap set
///
/// Exact string comparison after trimming; no network access.
async fn check_membership(
    url: String,
    sitemap_urls: Arc<HashSet<String>>,
    urls_header: String,
) -> ReportRow {
    let trimmed = url.trim().to_string();
    let found = sitemap_urls.contains(&trimmed);

    let mut row = ReportRow::new();
    row.insert(urls_header, trimmed);
    row.insert(FOUND_COLUMN.to_string(), found.to_string());
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_check_membership() {
        let set: Arc<HashSet<String>> = Arc::new(
            ["https://example.com/here".to_string()].into_iter().collect(),
        );

        let row = check_membership(
            " https://example.com/here ".to_string(),
            Arc::clone(&set),
            "Expected URLS".to_string(),
        )
        .await;
        assert_eq!(row[FOUND_COLUMN], "true");
        assert_eq!(row["Expected URLS"], "https://example.com/here");

        let row = check_membership(
            "https://example.com/missing".to_string(),
            set,
            "Expected URLS".to_string(),
        )
        .await;
        assert_eq!(row[FOUND_COLUMN], "false");
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(
                    r#"<urlset>
                        <url><loc>https://example.com/page1</loc></url>
                        <url><loc>https://example.com/page2</loc></url>
                    </urlset>"#,
                ),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("check.csv");
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "Sitemap,Expected URLS").unwrap();
        writeln!(file, "{}/sitemap.xml,https://example.com/page1", server.uri()).unwrap();
        writeln!(file, ",https://example.com/other").unwrap();

        let mut config = Config::default();
        config.crawler.cooldown_ms = 0;
        config.output.results_dir = dir.path().join("results").display().to_string();

        let report_path = run(&config, &input, "sitemap", "expected urls")
            .await
            .unwrap();

        let table = report::load_rows(&report_path).unwrap();
        assert_eq!(table.len(), 2);

        let verdicts: Vec<(String, String)> = table
            .rows()
            .map(|row| {
                (
                    row.get("Expected URLS").unwrap_or("").to_string(),
                    row.get(FOUND_COLUMN).unwrap_or("").to_string(),
                )
            })
            .collect();
        assert!(verdicts.contains(&(
            "https://example.com/page1".to_string(),
            "true".to_string()
        )));
        assert!(verdicts.contains(&(
            "https://example.com/other".to_string(),
            "false".to_string()
        )));
    }

    #[tokio::test]
    async fn test_run_root_failure_aborts_command() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("check.csv");
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "Sitemap,Expected URLS").unwrap();
        writeln!(file, "{}/sitemap.xml,https://example.com/page1", server.uri()).unwrap();

        let mut config = Config::default();
        config.crawler.cooldown_ms = 0;
        config.output.results_dir = dir.path().join("results").display().to_string();

        let result = run(&config, &input, "Sitemap", "Expected URLS").await;
        assert!(matches!(result, Err(crate::SweepError::Resolve(_))));
    }

    #[tokio::test]
    async fn test_run_rejects_malformed_sitemap_url() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("check.csv");
        std::fs::write(
            &input,
            "Sitemap,Expected URLS\nnot a url,https://example.com/page1\n",
        )
        .unwrap();

        let config = Config::default();
        let result = run(&config, &input, "Sitemap", "Expected URLS").await;
        assert!(matches!(result, Err(crate::SweepError::UrlParse(_))));
    }

    #[tokio::test]
    async fn test_run_empty_sitemap_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("check.csv");
        std::fs::write(&input, "Sitemap,Expected URLS\n,https://example.com/page1\n").unwrap();

        let config = Config::default();
        let result = run(&config, &input, "Sitemap", "Expected URLS").await;
        assert!(matches!(
            result,
            Err(crate::SweepError::Report(ReportError::EmptyColumn(_)))
        ));
    }
}

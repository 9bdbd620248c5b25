//! Tagsweep main entry point
//!
//! Command-line interface for the tagsweep SEO audit crawler.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tagsweep::config::{load_config, Config};
use tagsweep::{ReportError, SweepError};
use tracing_subscriber::EnvFilter;

/// Tagsweep: a concurrent on-page SEO audit crawler
///
/// Tagsweep fetches batches of URLs concurrently to audit their meta tags
/// and sitemap coverage, writing the results as tabular reports.
#[derive(Parser, Debug)]
#[command(name = "tagsweep")]
#[command(version)]
#[command(about = "Concurrent on-page SEO audit crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply without one)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a list of URLs for specific meta tags
    ScanMetas {
        /// Path to the CSV file with URLs
        file_path: PathBuf,

        /// Name of the column containing the URLs
        column_name: String,

        /// Meta tags to check (e.g. robots description viewport)
        #[arg(long, num_args = 1.., default_value = "robots")]
        checks: Vec<String>,
    },

    /// Audit meta tag content against expected values
    CompareMetas {
        /// Path to the CSV file with URLs, tag names, and expected content
        file_path: PathBuf,

        /// Name of the column containing the URLs
        #[arg(long, default_value = "URL")]
        url_col: String,

        /// Name of the column containing the meta tag names
        #[arg(long, default_value = "Meta Name")]
        name_col: String,

        /// Name of the column containing the expected content
        #[arg(long, default_value = "Expected Content")]
        content_col: String,
    },

    /// Scan a sitemap and audit expected URLs against it
    SitemapCheck {
        /// Path to the CSV file with sitemap URL and expected URL columns
        file_path: PathBuf,

        /// Name of the column containing the sitemap URL
        #[arg(long, default_value = "Sitemap")]
        sitemap_col: String,

        /// Name of the column with the expected URLs
        #[arg(long, default_value = "Expected URLS")]
        urls_col: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    let outcome = match &cli.command {
        Command::ScanMetas {
            file_path,
            column_name,
            checks,
        } => tagsweep::commands::scan_metas::run(&config, file_path, column_name, checks).await,

        Command::CompareMetas {
            file_path,
            url_col,
            name_col,
            content_col,
        } => {
            tagsweep::commands::compare_metas::run(&config, file_path, url_col, name_col, content_col)
                .await
        }

        Command::SitemapCheck {
            file_path,
            sitemap_col,
            urls_col,
        } => tagsweep::commands::sitemap_check::run(&config, file_path, sitemap_col, urls_col).await,
    };

    match outcome {
        Ok(report_path) => {
            println!("Report written to {}", report_path.display());
            Ok(())
        }
        Err(e) => {
            explain_input_error(&e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tagsweep=info,warn"),
            1 => EnvFilter::new("tagsweep=debug,info"),
            2 => EnvFilter::new("tagsweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints a correction hint for recoverable input mistakes
fn explain_input_error(error: &SweepError) {
    match error {
        SweepError::Report(ReportError::FileNotFound(path)) => {
            eprintln!(
                "Input file '{}' was not found. Check the path and try again.",
                path.display()
            );
        }
        SweepError::Report(ReportError::ColumnNotFound(column)) => {
            eprintln!(
                "Column '{}' was not found in the input file. Check the column name and try again.",
                column
            );
        }
        SweepError::Report(ReportError::EmptyColumn(column)) => {
            eprintln!("Column '{}' has no values to work with.", column);
        }
        _ => {}
    }
}

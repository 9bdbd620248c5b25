//! Audit commands
//!
//! Each command reads a tabular input file, fans the work out through the
//! concurrent task runner, and writes a tabular report. Per-URL failures are
//! isolated inside worker functions; only resource acquisition failures
//! (unreadable input, uncreatable output) abort a command.

pub mod compare_metas;
pub mod scan_metas;
pub mod sitemap_check;

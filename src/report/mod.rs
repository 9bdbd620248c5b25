//! Tabular input and output
//!
//! Reports flow in and out of tagsweep as CSV tables: input files supply the
//! URL batches to audit, and each command writes its results as one table
//! with a uniform column shape.

pub mod reader;
pub mod writer;

pub use reader::{load_rows, Row, Table};
pub use writer::write_table;

use std::collections::HashMap;

/// A flat column-name-to-value mapping produced by one completed task
///
/// Every row in a batch carries the same key set; an error marker value may
/// stand in for a normal value. Rows are created by workers and consumed once
/// when the output table is written.
pub type ReportRow = HashMap<String, String>;

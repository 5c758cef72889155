//! Tabular data source port trait.

use std::path::Path;

use crate::domain::error::AnalysisError;
use crate::domain::table::Table;

/// Reads one delimited table, preserving every source column.
pub trait TableSource {
    fn load(&self, path: &Path, name: &str) -> Result<Table, AnalysisError>;
}

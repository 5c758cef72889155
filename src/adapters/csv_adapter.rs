//! CSV file table adapter.

use crate::domain::error::AnalysisError;
use crate::domain::table::{Table, cell_from_raw};
use crate::ports::data_port::TableSource;
use std::fs;
use std::path::Path;

pub struct CsvAdapter {
    delimiter: u8,
}

impl CsvAdapter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Parse CSV text with a header row into a [`Table`].
    pub fn parse(&self, content: &str, name: &str, source: &str) -> Result<Table, AnalysisError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| AnalysisError::Read {
            path: source.to_string(),
            reason: format!("CSV header error: {}", e),
        })?;
        let columns: Vec<String> = headers.iter().map(str::to_string).collect();
        let width = columns.len();

        let mut table = Table::new(name, columns);

        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| AnalysisError::Read {
                path: source.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            if record.len() > width {
                return Err(AnalysisError::Read {
                    path: source.to_string(),
                    reason: format!(
                        "expected {} fields in data row {}, saw {}",
                        width,
                        i + 1,
                        record.len()
                    ),
                });
            }

            table.push_row(record.iter().map(cell_from_raw).collect());
        }

        Ok(table)
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for CsvAdapter {
    fn load(&self, path: &Path, name: &str) -> Result<Table, AnalysisError> {
        let content = fs::read_to_string(path).map_err(|e| AnalysisError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let table = self.parse(&content, name, &path.display().to_string())?;
        tracing::info!(
            table = name,
            rows = table.height(),
            columns = table.width(),
            path = %path.display(),
            "loaded table"
        );
        Ok(table)
    }
}

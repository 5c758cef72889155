#![allow(dead_code)]

use sentitrade::domain::error::AnalysisError;
use sentitrade::domain::table::{Table, cell_from_raw};
use sentitrade::ports::data_port::TableSource;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct MockTableSource {
    pub tables: HashMap<PathBuf, Table>,
    pub errors: HashMap<PathBuf, String>,
}

impl MockTableSource {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_table(mut self, path: &str, table: Table) -> Self {
        self.tables.insert(PathBuf::from(path), table);
        self
    }

    pub fn with_error(mut self, path: &str, reason: &str) -> Self {
        self.errors.insert(PathBuf::from(path), reason.to_string());
        self
    }
}

impl TableSource for MockTableSource {
    fn load(&self, path: &Path, name: &str) -> Result<Table, AnalysisError> {
        if let Some(reason) = self.errors.get(path) {
            return Err(AnalysisError::Read {
                path: path.display().to_string(),
                reason: reason.clone(),
            });
        }
        match self.tables.get(path) {
            Some(table) => {
                let mut table = table.clone();
                table.name = name.to_string();
                Ok(table)
            }
            None => Err(AnalysisError::Read {
                path: path.display().to_string(),
                reason: "No such file or directory".to_string(),
            }),
        }
    }
}

pub fn make_table(name: &str, columns: &[&str], rows: &[&[&str]]) -> Table {
    let mut table = Table::new(name, columns.iter().map(|c| c.to_string()).collect());
    for row in rows {
        table.push_row(row.iter().map(|c| cell_from_raw(c)).collect());
    }
    table
}

pub fn make_trades(rows: &[(&str, &str, &str)]) -> Table {
    let mut table = Table::new(
        "historical",
        vec![
            "Timestamp IST".to_string(),
            "Closed PnL".to_string(),
            "Leverage".to_string(),
        ],
    );
    for (ts, pnl, leverage) in rows {
        table.push_row(vec![cell_from_raw(ts), cell_from_raw(pnl), cell_from_raw(leverage)]);
    }
    table
}

pub fn make_sentiment(rows: &[(&str, &str)]) -> Table {
    let mut table = Table::new(
        "sentiment",
        vec!["date".to_string(), "classification".to_string()],
    );
    for (date, label) in rows {
        table.push_row(vec![cell_from_raw(date), cell_from_raw(label)]);
    }
    table
}

pub fn cell<'a>(table: &'a Table, row: usize, column: &str) -> Option<&'a str> {
    let idx = table.column_index(column)?;
    table.rows.get(row)?.get(idx)?.as_deref()
}

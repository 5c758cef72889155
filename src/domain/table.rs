//! In-memory tabular data.
//!
//! A [`Table`] keeps every source column in its original order and stores
//! cells as optional text. Derived columns are assigned with
//! [`Table::set_column`], which replaces a same-named column in place or
//! appends a new one.

use std::fmt;

/// Cell text recognised as a missing value on load.
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "#N/A N/A", "#NA", "<NA>", "-1.#IND", "1.#IND", "-1.#QNAN", "1.#QNAN",
];

/// Cell value: `None` when missing.
pub type Cell = Option<String>;

/// Normalise raw cell text, mapping missing-value tokens to `None`.
pub fn cell_from_raw(raw: &str) -> Cell {
    if MISSING_TOKENS.contains(&raw.trim()) {
        None
    } else {
        Some(raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding short rows with missing cells.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Index of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate the cells of the column at `index`.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    /// Assign a column by name: replace in place if present, else append.
    ///
    /// `values` must have one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// The first `n` rows as a new table.
    pub fn head(&self, n: usize) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Renders the table as aligned text with a leading row index, missing
/// cells shown as `NaN`.
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.as_deref().unwrap_or("NaN").chars().count();
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(len);
                }
            }
        }

        write!(f, "{:index_width$}", "")?;
        for (col, w) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>w$}", col, w = *w)?;
        }
        writeln!(f)?;

        for (idx, row) in self.rows.iter().enumerate() {
            write!(f, "{:<index_width$}", idx)?;
            for (cell, w) in row.iter().zip(&widths) {
                write!(f, "  {:>w$}", cell.as_deref().unwrap_or("NaN"), w = *w)?;
            }
            writeln!(f)?;
        }

        write!(
            f,
            "\n[{} rows x {} columns]",
            self.rows.len(),
            self.columns.len()
        )
    }
}

//! Schema resolution: locate the columns the analysis needs under naming
//! ambiguity.
//!
//! Every scan is an ordered walk over the table's column names with early
//! return, so the first matching column in source order wins.

use crate::domain::error::AnalysisError;
use crate::domain::table::Table;

/// Date column names accepted in the sentiment table, in priority order.
pub const DATE_CANDIDATES: [&str; 2] = ["Date", "date"];

/// Name of the normalized calendar-date column on both sides of the join.
pub const DATE_COLUMN: &str = "Date";

/// Resolved column names, bound once per run and passed forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBindings {
    /// Sentiment date column as found in the source (`Date` or `date`).
    pub date: String,
    /// Sentiment classification column as found in the source.
    pub classification: String,
    /// Leverage column in the joined table, if any.
    pub leverage: Option<String>,
}

/// Bindings found on the sentiment table alone, before the join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentColumns {
    pub date: String,
    pub classification: String,
}

impl SentimentColumns {
    /// Complete the bindings with the leverage column found after the join.
    pub fn with_leverage(self, leverage: Option<String>) -> ColumnBindings {
        ColumnBindings {
            date: self.date,
            classification: self.classification,
            leverage,
        }
    }
}

/// Resolve the date and classification columns of the sentiment table.
pub fn resolve_sentiment_columns(sentiment: &Table) -> Result<SentimentColumns, AnalysisError> {
    let date = resolve_date_column(&sentiment.columns)?;
    let classification = resolve_classification_column(&sentiment.columns)?;
    Ok(SentimentColumns {
        date,
        classification,
    })
}

/// Exact, case-sensitive match against [`DATE_CANDIDATES`].
pub fn resolve_date_column(columns: &[String]) -> Result<String, AnalysisError> {
    for candidate in DATE_CANDIDATES {
        if columns.iter().any(|c| c == candidate) {
            return Ok(candidate.to_string());
        }
    }
    Err(AnalysisError::MissingDateColumn {
        candidates: DATE_CANDIDATES.iter().map(|c| c.to_string()).collect(),
    })
}

/// First column whose lowercased name is `classification`, or contains
/// `class` or `sentiment`.
pub fn resolve_classification_column(columns: &[String]) -> Result<String, AnalysisError> {
    for column in columns {
        if is_classification_name(column) {
            return Ok(column.clone());
        }
    }
    Err(AnalysisError::MissingClassificationColumn {
        checked: columns.to_vec(),
    })
}

fn is_classification_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower == "classification" || lower.contains("class") || lower.contains("sentiment")
}

/// First column whose lowercased name is exactly `leverage`.
pub fn resolve_leverage_column(columns: &[String]) -> Option<String> {
    columns
        .iter()
        .find(|c| c.to_lowercase() == "leverage")
        .cloned()
}

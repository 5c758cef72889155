//! The analysis pipeline: resolve, align, join, aggregate, correlate.
//!
//! [`analyze`] composes the stages in fixed order over already-loaded
//! tables, so every stage can be exercised without the file system or a
//! renderer. Each stage runs exactly once.

use std::fmt;

use crate::domain::aggregate::{Summary, numeric_column, summarize};
use crate::domain::align::{align_sentiment, align_trades, left_join, right_column_name};
use crate::domain::correlation::CorrelationMatrix;
use crate::domain::error::AnalysisError;
use crate::domain::resolver::{
    ColumnBindings, DATE_COLUMN, resolve_leverage_column, resolve_sentiment_columns,
};
use crate::domain::sentiment::{SENTIMENT_NUM_COLUMN, encode_sentiment};
use crate::domain::table::Table;

/// Fixed column names expected verbatim in the historical table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFields {
    pub timestamp: String,
    pub pnl: String,
}

impl Default for InputFields {
    fn default() -> Self {
        Self {
            timestamp: "Timestamp IST".to_string(),
            pnl: "Closed PnL".to_string(),
        }
    }
}

/// A feature dropped from the output without failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    MissingLeverage,
    IncompleteSentimentMapping,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::MissingLeverage => write!(
                f,
                "'leverage' column not found; it will be excluded from aggregation"
            ),
            Degradation::IncompleteSentimentMapping => write!(
                f,
                "some sentiment labels are not in the mapping; '{SENTIMENT_NUM_COLUMN}' will not be derived"
            ),
        }
    }
}

/// Everything the reporters need from one run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Historical table with derived `Time` and `Date` columns.
    pub historical: Table,
    /// Sentiment table with the normalized `Date` column.
    pub sentiment: Table,
    /// Left join of trades to sentiment, plus `Sentiment_Num` when derived.
    pub joined: Table,
    pub bindings: ColumnBindings,
    /// Classification column name in the joined table.
    pub classification_column: String,
    pub pnl_column: String,
    pub summary: Summary,
    pub correlation: CorrelationMatrix,
    pub warnings: Vec<Degradation>,
}

impl Analysis {
    pub fn sentiment_encoded(&self) -> bool {
        self.joined.has_column(SENTIMENT_NUM_COLUMN)
    }

    pub fn has_leverage(&self) -> bool {
        self.bindings.leverage.is_some()
    }
}

/// Run every stage after loading over the two source tables.
pub fn analyze(
    historical: Table,
    sentiment: Table,
    fields: &InputFields,
) -> Result<Analysis, AnalysisError> {
    let sentiment_columns = resolve_sentiment_columns(&sentiment)?;
    tracing::info!(
        date = %sentiment_columns.date,
        classification = %sentiment_columns.classification,
        "resolved sentiment columns"
    );

    let historical = align_trades(historical, &fields.timestamp)?;
    let sentiment = align_sentiment(sentiment, &sentiment_columns.date)?;

    let mut joined = left_join(&historical, &sentiment, DATE_COLUMN)?;
    let classification_column =
        right_column_name(&historical, &sentiment_columns.classification, DATE_COLUMN);
    tracing::debug!(
        rows = joined.height(),
        columns = joined.width(),
        "joined trades to sentiment"
    );

    let mut warnings = Vec::new();

    let bindings = sentiment_columns.with_leverage(resolve_leverage_column(&joined.columns));
    if bindings.leverage.is_none() {
        tracing::warn!("{}", Degradation::MissingLeverage);
        warnings.push(Degradation::MissingLeverage);
    }

    let summary = summarize(
        &joined,
        &classification_column,
        &fields.pnl,
        bindings.leverage.as_deref(),
    )?;

    if !encode_sentiment(&mut joined, &classification_column) {
        tracing::warn!("{}", Degradation::IncompleteSentimentMapping);
        warnings.push(Degradation::IncompleteSentimentMapping);
    }

    let correlation = correlate(&joined, &fields.pnl, bindings.leverage.as_deref())?;

    Ok(Analysis {
        historical,
        sentiment,
        joined,
        bindings,
        classification_column,
        pnl_column: fields.pnl.clone(),
        summary,
        correlation,
        warnings,
    })
}

/// Correlate PnL with leverage and encoded sentiment, where available.
pub fn correlate(
    joined: &Table,
    pnl_column: &str,
    leverage_column: Option<&str>,
) -> Result<CorrelationMatrix, AnalysisError> {
    let mut names = vec![pnl_column];
    names.extend(leverage_column);
    if joined.has_column(SENTIMENT_NUM_COLUMN) {
        names.push(SENTIMENT_NUM_COLUMN);
    }

    let columns = names
        .into_iter()
        .map(|name| Ok((name.to_string(), numeric_column(joined, name)?)))
        .collect::<Result<Vec<_>, AnalysisError>>()?;

    Ok(CorrelationMatrix::compute(&columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::cell_from_raw;

    fn table(name: &str, columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|c| cell_from_raw(c)).collect());
        }
        t
    }

    #[test]
    fn worked_example_single_trade() {
        let historical = table(
            "historical",
            &["Timestamp IST", "Closed PnL"],
            &[&["01-02-2023 10:00", "100"]],
        );
        let sentiment = table(
            "sentiment",
            &["date", "classification"],
            &[&["2023-02-01", "Greed"]],
        );

        let analysis = analyze(historical, sentiment, &InputFields::default()).unwrap();

        let date_idx = analysis.joined.column_index("Date").unwrap();
        let class_idx = analysis.joined.column_index("classification").unwrap();
        assert_eq!(analysis.joined.rows[0][date_idx].as_deref(), Some("2023-02-01"));
        assert_eq!(analysis.joined.rows[0][class_idx].as_deref(), Some("Greed"));
        assert_eq!(analysis.summary.records.len(), 1);
        assert_eq!(analysis.summary.records[0].closed_pnl, 100.0);
        assert_eq!(
            analysis.warnings,
            vec![
                Degradation::MissingLeverage,
                Degradation::IncompleteSentimentMapping
            ]
        );
    }

    #[test]
    fn missing_date_column_fails_before_aggregation() {
        let historical = table(
            "historical",
            &["Timestamp IST", "Closed PnL"],
            &[&["01-02-2023 10:00", "100"]],
        );
        let sentiment = table("sentiment", &["day", "classification"], &[&["2023-02-01", "Fear"]]);
        let err = analyze(historical, sentiment, &InputFields::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingDateColumn { .. }));
    }

    #[test]
    fn correlate_includes_available_columns_only() {
        let joined = table(
            "joined",
            &["Closed PnL", "Leverage", "Sentiment_Num"],
            &[&["1", "2", "0"], &["2", "3", "1"], &["4", "1", "1"]],
        );
        let with_all = correlate(&joined, "Closed PnL", Some("Leverage")).unwrap();
        assert_eq!(with_all.labels, vec!["Closed PnL", "Leverage", "Sentiment_Num"]);

        let pnl_only = table("joined", &["Closed PnL"], &[&["1"], &["2"]]);
        let matrix = correlate(&pnl_only, "Closed PnL", None).unwrap();
        assert_eq!(matrix.labels, vec!["Closed PnL"]);
    }
}

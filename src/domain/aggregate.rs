//! Grouping joined trades by (date, classification).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::align::DATE_FORMAT;
use crate::domain::error::AnalysisError;
use crate::domain::resolver::DATE_COLUMN;
use crate::domain::table::Table;

/// One row per (date, classification) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub date: NaiveDate,
    pub classification: String,
    pub closed_pnl: f64,
    /// Mean leverage of the group; `None` when leverage is unbound or every
    /// value in the group is missing.
    pub leverage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub classification_column: String,
    pub pnl_column: String,
    /// Leverage column name when leverage was aggregated.
    pub leverage_column: Option<String>,
    /// Sorted by date, then classification.
    pub records: Vec<SummaryRecord>,
}

impl Summary {
    /// Column names in display order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![
            DATE_COLUMN.to_string(),
            self.classification_column.clone(),
            self.pnl_column.clone(),
        ];
        if let Some(ref lev) = self.leverage_column {
            columns.push(lev.clone());
        }
        columns
    }

    /// Render the summary as a [`Table`] for previews.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new("summary", self.columns());
        for r in &self.records {
            let mut row = vec![
                Some(r.date.format(DATE_FORMAT).to_string()),
                Some(r.classification.clone()),
                Some(format_number(r.closed_pnl)),
            ];
            if self.leverage_column.is_some() {
                row.push(r.leverage.map(format_number));
            }
            table.push_row(row);
        }
        table
    }

    /// Distinct classifications in order of first appearance.
    pub fn classifications(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for r in &self.records {
            if !seen.contains(&r.classification.as_str()) {
                seen.push(&r.classification);
            }
        }
        seen
    }
}

pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Parse the numeric cells of `column`. Missing cells stay `None`.
pub fn numeric_column(table: &Table, column: &str) -> Result<Vec<Option<f64>>, AnalysisError> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| AnalysisError::MissingColumn {
            table: table.name.clone(),
            column: column.to_string(),
        })?;

    table
        .column_values(idx)
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(text) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| AnalysisError::InvalidNumber {
                    column: column.to_string(),
                    row,
                    value: text.to_string(),
                }),
        })
        .collect()
}

#[derive(Default)]
struct GroupAccumulator {
    pnl_sum: f64,
    leverage_sum: f64,
    leverage_count: usize,
}

/// Group `joined` by (`Date`, classification), summing PnL and averaging
/// leverage when a leverage column is given.
///
/// Rows with a missing date or classification belong to no group.
pub fn summarize(
    joined: &Table,
    classification_column: &str,
    pnl_column: &str,
    leverage_column: Option<&str>,
) -> Result<Summary, AnalysisError> {
    let date_idx = joined
        .column_index(DATE_COLUMN)
        .ok_or_else(|| AnalysisError::MissingColumn {
            table: joined.name.clone(),
            column: DATE_COLUMN.to_string(),
        })?;
    let class_idx = joined
        .column_index(classification_column)
        .ok_or_else(|| AnalysisError::MissingColumn {
            table: joined.name.clone(),
            column: classification_column.to_string(),
        })?;

    let pnl = numeric_column(joined, pnl_column)?;
    let leverage = leverage_column
        .map(|c| numeric_column(joined, c))
        .transpose()?;

    let mut groups: BTreeMap<(NaiveDate, String), GroupAccumulator> = BTreeMap::new();

    for (row_idx, row) in joined.rows.iter().enumerate() {
        let (Some(date_text), Some(class)) = (&row[date_idx], &row[class_idx]) else {
            continue;
        };
        let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|_| {
            AnalysisError::InvalidDate {
                column: DATE_COLUMN.to_string(),
                row: row_idx,
                value: date_text.clone(),
            }
        })?;

        let acc = groups.entry((date, class.clone())).or_default();
        if let Some(v) = pnl[row_idx] {
            acc.pnl_sum += v;
        }
        if let Some(Some(v)) = leverage.as_ref().map(|l| l[row_idx]) {
            acc.leverage_sum += v;
            acc.leverage_count += 1;
        }
    }

    let records: Vec<SummaryRecord> = groups
        .into_iter()
        .map(|((date, classification), acc)| SummaryRecord {
            date,
            classification,
            closed_pnl: acc.pnl_sum,
            leverage: (leverage.is_some() && acc.leverage_count > 0)
                .then(|| acc.leverage_sum / acc.leverage_count as f64),
        })
        .collect();

    tracing::debug!(
        groups = records.len(),
        "summarized joined trades by date and classification"
    );

    Ok(Summary {
        classification_column: classification_column.to_string(),
        pnl_column: pnl_column.to_string(),
        leverage_column: leverage_column.map(str::to_string),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::cell_from_raw;

    fn joined(rows: &[&[&str]], with_leverage: bool) -> Table {
        let mut columns = vec!["Date".to_string(), "Closed PnL".to_string()];
        if with_leverage {
            columns.push("Leverage".to_string());
        }
        columns.push("classification".to_string());
        let mut t = Table::new("joined", columns);
        for row in rows {
            t.push_row(row.iter().map(|c| cell_from_raw(c)).collect());
        }
        t
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sums_pnl_per_date_and_class() {
        let t = joined(
            &[
                &["2023-02-01", "100", "Greed"],
                &["2023-02-01", "-40", "Greed"],
                &["2023-02-02", "7", "Fear"],
            ],
            false,
        );
        let summary = summarize(&t, "classification", "Closed PnL", None).unwrap();

        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.records[0].date, date(2023, 2, 1));
        assert_eq!(summary.records[0].classification, "Greed");
        assert_eq!(summary.records[0].closed_pnl, 60.0);
        assert_eq!(summary.records[0].leverage, None);
        assert_eq!(
            summary.columns(),
            vec!["Date", "classification", "Closed PnL"]
        );
    }

    #[test]
    fn groups_sorted_by_date_then_class() {
        let t = joined(
            &[
                &["2023-02-02", "1", "Greed"],
                &["2023-02-01", "1", "Greed"],
                &["2023-02-01", "1", "Fear"],
            ],
            false,
        );
        let summary = summarize(&t, "classification", "Closed PnL", None).unwrap();
        let keys: Vec<_> = summary
            .records
            .iter()
            .map(|r| (r.date, r.classification.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (date(2023, 2, 1), "Fear"),
                (date(2023, 2, 1), "Greed"),
                (date(2023, 2, 2), "Greed"),
            ]
        );
        assert_eq!(summary.classifications(), vec!["Fear", "Greed"]);
    }

    #[test]
    fn nan_spellings_are_skipped_in_sums() {
        let t = joined(
            &[
                &["2023-02-01", "10", "Fear"],
                &["2023-02-01", "-nan", "Fear"],
                &["2023-02-01", "1.#IND", "Fear"],
            ],
            false,
        );
        let summary = summarize(&t, "classification", "Closed PnL", None).unwrap();
        assert_eq!(summary.records[0].closed_pnl, 10.0);
    }

    #[test]
    fn missing_classification_rows_are_excluded() {
        let t = joined(&[&["2023-02-01", "5", ""], &["2023-02-01", "3", "Fear"]], false);
        let summary = summarize(&t, "classification", "Closed PnL", None).unwrap();
        assert_eq!(summary.records.len(), 1);
        assert_eq!(summary.records[0].closed_pnl, 3.0);
    }

    #[test]
    fn leverage_mean_skips_missing_values() {
        let t = joined(
            &[
                &["2023-02-01", "1", "2", "Fear"],
                &["2023-02-01", "1", "", "Fear"],
                &["2023-02-01", "1", "4", "Fear"],
                &["2023-02-02", "1", "", "Greed"],
            ],
            true,
        );
        let summary = summarize(&t, "classification", "Closed PnL", Some("Leverage")).unwrap();
        assert_eq!(summary.records[0].leverage, Some(3.0));
        assert_eq!(summary.records[1].leverage, None);
        assert_eq!(summary.columns().len(), 4);
    }

    #[test]
    fn non_numeric_pnl_is_error() {
        let t = joined(&[&["2023-02-01", "lots", "Fear"]], false);
        let err = summarize(&t, "classification", "Closed PnL", None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidNumber { row: 0, .. }));
    }

    #[test]
    fn summary_table_formats_numbers() {
        let t = joined(&[&["2023-02-01", "100.50", "Greed"]], false);
        let table = summarize(&t, "classification", "Closed PnL", None)
            .unwrap()
            .to_table();
        assert_eq!(table.rows[0][2].as_deref(), Some("100.5"));
    }

    #[test]
    fn format_number_trims_trailing_zeros() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-0.25), "-0.25");
        assert_eq!(format_number(f64::NAN), "NaN");
    }
}

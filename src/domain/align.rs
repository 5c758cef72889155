//! Date alignment and the trade/sentiment left join.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::error::AnalysisError;
use crate::domain::resolver::DATE_COLUMN;
use crate::domain::table::{Cell, Table};

/// Name of the parsed trade timestamp column.
pub const TIME_COLUMN: &str = "Time";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
];

const DAY_FIRST_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];

const SENTIMENT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const SENTIMENT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%m.%d.%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%b %d, %Y",
];

/// Parse a trade timestamp with day/month/year ordering.
///
/// ISO `year-month-day` text is still read year first.
pub fn parse_day_first_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DAY_FIRST_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DAY_FIRST_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a sentiment date, detecting the format. Any time of day is dropped.
///
/// Numeric dates with the year last are read month first whatever the
/// separator, falling back to day first when the month-first reading is
/// impossible.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    SENTIMENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            SENTIMENT_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse every cell of `column` with `parse`, formatting results with
/// `format`. Missing cells stay missing; unparseable text is an error.
fn derive_column<T, P, F>(
    table: &Table,
    column: &str,
    parse: P,
    format: F,
) -> Result<Vec<Cell>, AnalysisError>
where
    P: Fn(&str) -> Option<T>,
    F: Fn(T) -> String,
{
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
            Some(text) => parse(text).map(|v| Some(format(v))).ok_or_else(|| {
                AnalysisError::InvalidDate {
                    column: column.to_string(),
                    row,
                    value: text.to_string(),
                }
            }),
        })
        .collect()
}

/// Add `Time` (parsed day-first timestamp) and `Date` (its calendar date)
/// to the historical table.
pub fn align_trades(mut historical: Table, timestamp_column: &str) -> Result<Table, AnalysisError> {
    let times = derive_column(
        &historical,
        timestamp_column,
        parse_day_first_datetime,
        |dt: NaiveDateTime| dt.format(TIME_FORMAT).to_string(),
    )?;
    let dates = derive_column(
        &historical,
        timestamp_column,
        |s: &str| parse_day_first_datetime(s).map(|dt| dt.date()),
        |d: NaiveDate| d.format(DATE_FORMAT).to_string(),
    )?;

    historical.set_column(TIME_COLUMN, times);
    historical.set_column(DATE_COLUMN, dates);
    Ok(historical)
}

/// Normalize the bound sentiment date column into a `Date` column.
pub fn align_sentiment(mut sentiment: Table, date_column: &str) -> Result<Table, AnalysisError> {
    let dates = derive_column(&sentiment, date_column, parse_calendar_date, |d: NaiveDate| {
        d.format(DATE_FORMAT).to_string()
    })?;
    sentiment.set_column(DATE_COLUMN, dates);
    Ok(sentiment)
}

/// Name a right-hand column takes in the joined table.
///
/// Non-key names present on both sides get a `_y` suffix on the right.
pub fn right_column_name(left: &Table, column: &str, on: &str) -> String {
    if column != on && left.has_column(column) {
        format!("{column}_y")
    } else {
        column.to_string()
    }
}

fn left_column_name(right: &Table, column: &str, on: &str) -> String {
    if column != on && right.has_column(column) {
        format!("{column}_x")
    } else {
        column.to_string()
    }
}

/// Left join `left` to `right` on equality of column `on`.
///
/// Every left row appears once per matching right row, or once with
/// missing right-hand cells when nothing matches. Missing keys never match.
/// Left row order is preserved.
pub fn left_join(left: &Table, right: &Table, on: &str) -> Result<Table, AnalysisError> {
    let left_key = left
        .column_index(on)
        .ok_or_else(|| AnalysisError::MissingColumn {
            table: left.name.clone(),
            column: on.to_string(),
        })?;
    let right_key = right
        .column_index(on)
        .ok_or_else(|| AnalysisError::MissingColumn {
            table: right.name.clone(),
            column: on.to_string(),
        })?;

    let right_indices: Vec<usize> = (0..right.width()).filter(|&i| i != right_key).collect();

    let mut columns: Vec<String> = left
        .columns
        .iter()
        .map(|c| left_column_name(right, c, on))
        .collect();
    columns.extend(
        right_indices
            .iter()
            .map(|&i| right_column_name(left, &right.columns[i], on)),
    );

    let mut lookup: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, key) in right.column_values(right_key).enumerate() {
        if let Some(key) = key {
            lookup.entry(key).or_default().push(i);
        }
    }

    let mut joined = Table::new("joined", columns);
    for row in &left.rows {
        let matches = row[left_key]
            .as_deref()
            .and_then(|key| lookup.get(key))
            .map(Vec::as_slice)
            .unwrap_or_default();

        if matches.is_empty() {
            let mut out = row.clone();
            out.extend(std::iter::repeat_n(None, right_indices.len()));
            joined.push_row(out);
            continue;
        }

        for &m in matches {
            let mut out = row.clone();
            out.extend(right_indices.iter().map(|&i| right.rows[m][i].clone()));
            joined.push_row(out);
        }
    }

    Ok(joined)
}

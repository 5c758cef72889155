//! Numeric encoding of sentiment labels.

use crate::domain::table::Table;

/// Name of the encoded sentiment column.
pub const SENTIMENT_NUM_COLUMN: &str = "Sentiment_Num";

/// Label to number mapping. Labels outside it encode as missing.
pub const SENTIMENT_MAPPING: [(&str, f64); 2] = [("Fear", 0.0), ("Greed", 1.0)];

pub fn encode_label(label: &str) -> Option<f64> {
    SENTIMENT_MAPPING
        .iter()
        .find(|(name, _)| *name == label)
        .map(|&(_, value)| value)
}

/// True when every mapped label occurs in `column`.
pub fn mapping_covered(table: &Table, column: &str) -> bool {
    let Some(idx) = table.column_index(column) else {
        return false;
    };
    SENTIMENT_MAPPING
        .iter()
        .all(|(label, _)| table.column_values(idx).any(|v| v == Some(*label)))
}

/// Add [`SENTIMENT_NUM_COLUMN`] to `table` when the mapping is covered.
///
/// Returns whether the column was added.
pub fn encode_sentiment(table: &mut Table, column: &str) -> bool {
    if !mapping_covered(table, column) {
        return false;
    }
    let Some(idx) = table.column_index(column) else {
        return false;
    };

    let encoded = table
        .column_values(idx)
        .map(|v| v.and_then(encode_label).map(|n| n.to_string()))
        .collect();
    table.set_column(SENTIMENT_NUM_COLUMN, encoded);
    true
}

//! Text formatting for console previews.

use crate::domain::correlation::CorrelationMatrix;
use crate::domain::resolver::ColumnBindings;
use crate::domain::table::Table;

/// `label: ['a', 'b', ...]`
pub fn render_columns(label: &str, columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{}'", c)).collect();
    format!("{}: [{}]", label, quoted.join(", "))
}

/// Title line followed by the first `rows` rows of `table`.
pub fn render_preview(title: &str, table: &Table, rows: usize) -> String {
    format!("{}\n{}", title, table.head(rows))
}

pub fn render_bindings(bindings: &ColumnBindings) -> String {
    let leverage = bindings.leverage.as_deref().unwrap_or("(not found)");
    format!(
        "Date column:           {}\nClassification column: {}\nLeverage column:       {}",
        bindings.date, bindings.classification, leverage
    )
}

fn fmt_coefficient(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "NaN".to_string(),
    }
}

/// Aligned matrix with row and column labels.
pub fn render_correlation(matrix: &CorrelationMatrix) -> String {
    if matrix.is_empty() {
        return "(no numeric columns to correlate)".to_string();
    }

    let label_width = matrix
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let col_widths: Vec<usize> = matrix
        .labels
        .iter()
        .map(|l| l.chars().count().max(9))
        .collect();

    let mut output = format!("{:label_width$}", "");
    for (label, w) in matrix.labels.iter().zip(&col_widths) {
        output.push_str(&format!("  {:>w$}", label, w = *w));
    }

    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        output.push('\n');
        output.push_str(&format!("{:<label_width$}", label));
        for (value, w) in row.iter().zip(&col_widths) {
            output.push_str(&format!("  {:>w$}", fmt_coefficient(*value), w = *w));
        }
    }

    output
}

//! Console report adapter implementing ReportPort.
//!
//! Prints the previews of a finished analysis to stdout in pipeline order:
//! resolved classification column, source samples, joined sample, summary,
//! then the correlation matrix.

pub mod tables;

use crate::domain::error::AnalysisError;
use crate::domain::pipeline::Analysis;
use crate::ports::report_port::ReportPort;

pub struct ConsoleReport {
    preview_rows: usize,
}

impl ConsoleReport {
    pub fn new(preview_rows: usize) -> Self {
        Self { preview_rows }
    }

    /// Build the full console text for `analysis`.
    pub fn render(&self, analysis: &Analysis) -> String {
        let rows = self.preview_rows;
        let mut sections = vec![
            format!(
                "Using classification column: {}",
                analysis.bindings.classification
            ),
            tables::render_preview("\nHistorical Data Sample:", &analysis.historical, rows),
            tables::render_preview("\nFear Greed Index Sample:", &analysis.sentiment, rows),
            format!(
                "\n{}",
                tables::render_columns("Columns in merged data", &analysis.joined.columns)
            ),
            tables::render_preview("\nMerged Data Sample:", &analysis.joined, rows),
            tables::render_preview("\nSummary Data:", &analysis.summary.to_table(), rows),
        ];

        if !analysis.has_leverage() {
            sections.push("Skipping leverage boxplot as the column was not found.".to_string());
        }

        sections.push(format!(
            "\nCorrelation Matrix:\n{}",
            tables::render_correlation(&analysis.correlation)
        ));

        sections.join("\n")
    }
}

impl ReportPort for ConsoleReport {
    fn write(&self, analysis: &Analysis) -> Result<(), AnalysisError> {
        println!("{}", self.render(analysis));
        Ok(())
    }
}

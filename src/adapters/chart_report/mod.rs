//! SVG chart report adapter implementing ReportPort.
//!
//! Renders the PnL time series, the PnL and leverage box plots and the
//! correlation heatmap as standalone SVG files in an output directory. The
//! leverage box plot is only produced when a leverage column was resolved.

pub mod box_plot;
pub mod chart_svg;

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::aggregate::numeric_column;
use crate::domain::error::AnalysisError;
use crate::domain::pipeline::Analysis;
use crate::ports::report_port::ReportPort;

pub const PNL_TIMELINE_FILE: &str = "pnl_over_time.svg";
pub const PNL_BOX_FILE: &str = "pnl_by_sentiment.svg";
pub const LEVERAGE_BOX_FILE: &str = "leverage_by_sentiment.svg";
pub const HEATMAP_FILE: &str = "correlation_heatmap.svg";

/// A rendered chart and the file name it is written under.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub file_name: &'static str,
    pub svg: String,
}

pub struct ChartReport {
    output_dir: PathBuf,
}

impl ChartReport {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render every applicable chart. Charts with nothing to draw are
    /// omitted.
    pub fn render(analysis: &Analysis) -> Result<Vec<Chart>, AnalysisError> {
        let mut charts = Vec::new();

        charts.push(Chart {
            file_name: PNL_TIMELINE_FILE,
            svg: chart_svg::generate_pnl_timeline_svg(&analysis.summary),
        });

        charts.push(Chart {
            file_name: PNL_BOX_FILE,
            svg: category_box_plot(
                analysis,
                &analysis.pnl_column,
                "Distribution of Closed PnL by Market Sentiment",
                "Closed PnL",
            )?,
        });

        if let Some(ref leverage) = analysis.bindings.leverage {
            charts.push(Chart {
                file_name: LEVERAGE_BOX_FILE,
                svg: category_box_plot(
                    analysis,
                    leverage,
                    "Leverage Usage by Market Sentiment",
                    "Leverage",
                )?,
            });
        }

        charts.push(Chart {
            file_name: HEATMAP_FILE,
            svg: chart_svg::generate_heatmap_svg(&analysis.correlation),
        });

        charts.retain(|c| {
            if c.svg.is_empty() {
                tracing::warn!(chart = c.file_name, "no data to plot, chart skipped");
            }
            !c.svg.is_empty()
        });
        Ok(charts)
    }
}

fn category_box_plot(
    analysis: &Analysis,
    value_column: &str,
    title: &str,
    y_label: &str,
) -> Result<String, AnalysisError> {
    let joined = &analysis.joined;
    let class_idx = joined
        .column_index(&analysis.classification_column)
        .ok_or_else(|| AnalysisError::MissingColumn {
            table: joined.name.clone(),
            column: analysis.classification_column.clone(),
        })?;
    let values = numeric_column(joined, value_column)?;

    let groups = box_plot::group_by_category(joined.column_values(class_idx).zip(values));
    Ok(box_plot::generate_box_plot_svg(
        title,
        "Market Sentiment",
        y_label,
        &groups,
    ))
}

impl ReportPort for ChartReport {
    fn write(&self, analysis: &Analysis) -> Result<(), AnalysisError> {
        let charts = Self::render(analysis)?;

        fs::create_dir_all(&self.output_dir).map_err(|e| AnalysisError::Render {
            reason: format!(
                "failed to create output directory {}: {}",
                self.output_dir.display(),
                e
            ),
        })?;

        for chart in &charts {
            let path = self.output_dir.join(chart.file_name);
            fs::write(&path, &chart.svg).map_err(|e| AnalysisError::Render {
                reason: format!("failed to write {}: {}", path.display(), e),
            })?;
            tracing::info!(path = %path.display(), "chart written");
        }

        Ok(())
    }
}

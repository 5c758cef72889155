//! Report output port trait.

use crate::domain::error::AnalysisError;
use crate::domain::pipeline::Analysis;

/// Terminal stage: renders a finished analysis. Nothing downstream consumes
/// its output.
pub trait ReportPort {
    fn write(&self, analysis: &Analysis) -> Result<(), AnalysisError>;
}

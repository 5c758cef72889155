//! Domain error types.

/// Top-level error type for sentitrade.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("no {} column found in sentiment data", quote_all(.candidates))]
    MissingDateColumn { candidates: Vec<String> },

    #[error("no classification-related column found in sentiment data (checked {})", quote_all(.checked))]
    MissingClassificationColumn { checked: Vec<String> },

    #[error("missing column '{column}' in {table} data")]
    MissingColumn { table: String, column: String },

    #[error("invalid date in column '{column}' at row {row}: '{value}'")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },

    #[error("invalid number in column '{column}' at row {row}: '{value}'")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("render error: {reason}")]
    Render { reason: String },
}

fn quote_all(names: &[String]) -> String {
    if names.is_empty() {
        return "columns".to_string();
    }
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(" or ")
}

impl From<&AnalysisError> for std::process::ExitCode {
    fn from(err: &AnalysisError) -> Self {
        let code: u8 = match err {
            AnalysisError::Read { .. } | AnalysisError::Render { .. } => 1,
            AnalysisError::ConfigParse { .. } | AnalysisError::ConfigInvalid { .. } => 2,
            AnalysisError::MissingDateColumn { .. }
            | AnalysisError::MissingClassificationColumn { .. }
            | AnalysisError::MissingColumn { .. } => 3,
            AnalysisError::InvalidDate { .. } | AnalysisError::InvalidNumber { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

//! Run settings built and validated from a [`ConfigPort`].

use std::path::PathBuf;

use crate::domain::error::AnalysisError;
use crate::domain::pipeline::InputFields;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_HISTORICAL_PATH: &str = "historical_data.csv";
pub const DEFAULT_SENTIMENT_PATH: &str = "fear_greed_index.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "report";
pub const DEFAULT_PREVIEW_ROWS: i64 = 5;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub historical_path: PathBuf,
    pub sentiment_path: PathBuf,
    pub delimiter: u8,
    pub fields: InputFields,
    pub output_dir: PathBuf,
    pub preview_rows: usize,
    pub charts: bool,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            historical_path: PathBuf::from(DEFAULT_HISTORICAL_PATH),
            sentiment_path: PathBuf::from(DEFAULT_SENTIMENT_PATH),
            delimiter: b',',
            fields: InputFields::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            preview_rows: DEFAULT_PREVIEW_ROWS as usize,
            charts: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<Settings, AnalysisError> {
    let defaults = Settings::default();

    let preview_rows = config.get_int("report", "preview_rows", DEFAULT_PREVIEW_ROWS)?;
    if preview_rows < 1 {
        return Err(AnalysisError::ConfigInvalid {
            section: "report".to_string(),
            key: "preview_rows".to_string(),
            reason: "preview_rows must be at least 1".to_string(),
        });
    }

    Ok(Settings {
        historical_path: PathBuf::from(non_empty(
            config,
            "input",
            "historical_path",
            DEFAULT_HISTORICAL_PATH,
        )?),
        sentiment_path: PathBuf::from(non_empty(
            config,
            "input",
            "sentiment_path",
            DEFAULT_SENTIMENT_PATH,
        )?),
        delimiter: parse_delimiter(config)?,
        fields: InputFields {
            timestamp: non_empty(config, "input", "timestamp_column", &defaults.fields.timestamp)?,
            pnl: non_empty(config, "input", "pnl_column", &defaults.fields.pnl)?,
        },
        output_dir: PathBuf::from(non_empty(config, "report", "output_dir", DEFAULT_OUTPUT_DIR)?),
        preview_rows: preview_rows as usize,
        charts: config.get_bool("report", "charts", true)?,
        log_level: non_empty(config, "logging", "level", DEFAULT_LOG_LEVEL)?,
    })
}

/// `[input] delimiter`: a single ASCII character, or `tab` / `semicolon`.
fn parse_delimiter(config: &dyn ConfigPort) -> Result<u8, AnalysisError> {
    let Some(raw) = config.get_string("input", "delimiter") else {
        return Ok(b',');
    };
    match raw.trim() {
        "tab" | "\\t" => Ok(b'\t'),
        "semicolon" => Ok(b';'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(AnalysisError::ConfigInvalid {
            section: "input".to_string(),
            key: "delimiter".to_string(),
            reason: format!("expected a single ASCII character, 'tab' or 'semicolon', got '{raw}'"),
        }),
    }
}

/// Read a key, falling back to `default` when absent. Present but blank
/// values are rejected.
fn non_empty(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: &str,
) -> Result<String, AnalysisError> {
    match config.get_string(section, key) {
        None => Ok(default.to_string()),
        Some(s) if s.trim().is_empty() => Err(AnalysisError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must not be empty"),
        }),
        Some(s) => Ok(s.trim().to_string()),
    }
}

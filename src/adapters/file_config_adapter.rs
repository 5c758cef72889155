//! INI file configuration adapter.
//!
//! Every key is optional; a missing file at the default location yields an
//! empty configuration so built-in defaults apply. Only `#` starts a
//! comment, so `;` is an ordinary value character.

use crate::domain::error::AnalysisError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

/// Config file read from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "sentitrade.ini";

/// Characters that start a comment line.
const COMMENT_SYMBOLS: [char; 1] = ['#'];

fn new_ini() -> Ini {
    let mut defaults = Ini::new().defaults();
    defaults.comment_symbols = COMMENT_SYMBOLS.to_vec();
    Ini::new_from_defaults(defaults)
}

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = new_ini();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    /// Load `path` if given (it must exist), else [`DEFAULT_CONFIG_FILE`]
    /// if present, else an empty configuration.
    pub fn discover(path: Option<&Path>) -> Result<Self, AnalysisError> {
        let path = match path {
            Some(p) => p,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("no config file found, using defaults");
                return Ok(Self { config: new_ini() });
            }
        };

        Self::from_file(path).map_err(|e| AnalysisError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = new_ini();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, AnalysisError> {
        match self.config.get(section, key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| AnalysisError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("expected an integer, got '{raw}'"),
            }),
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, AnalysisError> {
        match self.config.get(section, key) {
            None => Ok(default),
            Some(raw) => Self::parse_bool(raw.trim()).ok_or_else(|| AnalysisError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("expected true/false, yes/no or 1/0, got '{raw}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[input]
historical_path = data/historical_data.csv
timestamp_column = Timestamp IST

[report]
preview_rows = 3
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("input", "historical_path"),
            Some("data/historical_data.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("input", "timestamp_column"),
            Some("Timestamp IST".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[input]\npnl_column = PnL\n").unwrap();
        assert_eq!(adapter.get_string("input", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn semicolon_is_a_value_not_a_comment() {
        let adapter =
            FileConfigAdapter::from_string("# comment\n[input]\ndelimiter = ;\n").unwrap();
        assert_eq!(adapter.get_string("input", "delimiter"), Some(";".to_string()));
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[report]\npreview_rows = 8\n").unwrap();
        assert_eq!(adapter.get_int("report", "preview_rows", 0).unwrap(), 8);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[report]\n").unwrap();
        assert_eq!(adapter.get_int("report", "missing", 42).unwrap(), 42);
    }

    #[test]
    fn get_int_rejects_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[report]\npreview_rows = abc\n").unwrap();
        let err = adapter.get_int("report", "preview_rows", 42).unwrap_err();
        assert!(matches!(err, AnalysisError::ConfigInvalid { ref key, .. } if key == "preview_rows"));
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[report]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("report", "a", false).unwrap());
        assert!(adapter.get_bool("report", "b", false).unwrap());
        assert!(adapter.get_bool("report", "c", false).unwrap());
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[report]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("report", "a", true).unwrap());
        assert!(!adapter.get_bool("report", "b", true).unwrap());
        assert!(!adapter.get_bool("report", "c", true).unwrap());
    }

    #[test]
    fn get_bool_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[report]\n").unwrap();
        assert!(adapter.get_bool("report", "missing", true).unwrap());
        assert!(!adapter.get_bool("report", "missing", false).unwrap());
    }

    #[test]
    fn get_bool_rejects_unknown_words() {
        let adapter = FileConfigAdapter::from_string("[report]\ncharts = nope\n").unwrap();
        assert!(matches!(
            adapter.get_bool("report", "charts", true),
            Err(AnalysisError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[report]\noutput_dir = /tmp/charts\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "output_dir"),
            Some("/tmp/charts".to_string())
        );
    }

    #[test]
    fn discover_explicit_missing_file_is_config_error() {
        let result = FileConfigAdapter::discover(Some(Path::new("/nonexistent/sentitrade.ini")));
        assert!(matches!(result, Err(AnalysisError::ConfigParse { .. })));
    }

    #[test]
    fn discover_explicit_file() {
        let file = create_temp_config("[input]\npnl_column = Realized\n");
        let adapter = FileConfigAdapter::discover(Some(file.path())).unwrap();
        assert_eq!(
            adapter.get_string("input", "pnl_column"),
            Some("Realized".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/sentitrade.ini");
        assert!(result.is_err());
    }
}

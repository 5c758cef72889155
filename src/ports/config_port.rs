//! Configuration access port trait.

use crate::domain::error::AnalysisError;

/// Typed getters return `default` when the key is absent and
/// [`AnalysisError::ConfigInvalid`] when it is present but unparseable.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, AnalysisError>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, AnalysisError>;
}

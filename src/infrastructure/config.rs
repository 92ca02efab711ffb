//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;

pub const APP_NAME: &str = "ayurdesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DATA_DIR_VAR: &str = "AYURDESK_DATA_DIR";
pub const LOG_FILE_VAR: &str = "AYURDESK_LOG_FILE";
pub const LOG_FILTER_VAR: &str = "AYURDESK_LOG";

pub fn default_log_filter() -> &'static str {
    "ayurdesk=info"
}

/// Where the profile lives and where diagnostics go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let data_dir = set(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let log_file = set(LOG_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(format!("{APP_NAME}.log")));
        let log_filter = set(LOG_FILTER_VAR).unwrap_or_else(|| default_log_filter().to_string());

        Self {
            data_dir,
            log_file,
            log_filter,
        }
    }
}

/// Platform data directory, or `./.ayurdesk` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_NAME}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = AppConfig::from_lookup(lookup(&[]));

        assert_eq!(config.data_dir, default_data_dir());
        assert_eq!(config.log_file, default_data_dir().join("ayurdesk.log"));
        assert_eq!(config.log_filter, "ayurdesk=info");
    }

    #[test]
    fn test_data_dir_override_moves_log_file() {
        let config = AppConfig::from_lookup(lookup(&[(DATA_DIR_VAR, "/tmp/clinic")]));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/clinic"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/clinic/ayurdesk.log"));
    }

    #[test]
    fn test_explicit_log_settings() {
        let config = AppConfig::from_lookup(lookup(&[
            (LOG_FILE_VAR, "/var/log/ayurdesk.log"),
            (LOG_FILTER_VAR, "ayurdesk=debug"),
        ]));

        assert_eq!(config.log_file, PathBuf::from("/var/log/ayurdesk.log"));
        assert_eq!(config.log_filter, "ayurdesk=debug");
    }

    #[test]
    fn test_blank_variables_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[(DATA_DIR_VAR, "  ")]));
        assert_eq!(config.data_dir, default_data_dir());
    }

    #[test]
    fn test_default_data_dir_ends_with_app_name() {
        assert!(default_data_dir().ends_with("ayurdesk") || default_data_dir().ends_with(".ayurdesk"));
    }
}

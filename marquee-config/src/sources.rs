use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    ENV_API_KEY, ENV_API_KEY_FILE, ENV_CONFIG_PATH, ENV_DISPLAY_NETWORKS,
    ENV_DISPLAY_STUDIOS, ENV_NOTIFICATION_CAPACITY, ENV_REFRESH_INTERVAL_HOURS,
    ENV_REQUEST_TIMEOUT_SECS, ENV_SERVICE_URL,
};
use crate::util::{non_empty_var, parse_csv_var};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub service: FileServiceConfig,
    #[serde(default)]
    pub refresh: FileRefreshConfig,
    #[serde(default)]
    pub display: FileDisplayConfig,
    #[serde(default)]
    pub http: FileHttpConfig,
    #[serde(default)]
    pub notifications: FileNotificationConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileServiceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_file: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileRefreshConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_hours: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileDisplayConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub studios: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileHttpConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileNotificationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

/// Environment-derived configuration values.
///
/// Numeric values are kept as raw text so the loader can report which
/// variable failed to parse instead of silently ignoring it.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub service_url: Option<String>,
    pub api_key: Option<String>,
    pub api_key_file: Option<PathBuf>,
    pub refresh_interval_hours: Option<String>,
    pub display_networks: Option<Vec<String>>,
    pub display_studios: Option<Vec<String>>,
    pub request_timeout_secs: Option<String>,
    pub notification_capacity: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: non_empty_var(ENV_CONFIG_PATH).map(PathBuf::from),
            service_url: non_empty_var(ENV_SERVICE_URL),
            api_key: non_empty_var(ENV_API_KEY),
            api_key_file: non_empty_var(ENV_API_KEY_FILE).map(PathBuf::from),
            refresh_interval_hours: non_empty_var(ENV_REFRESH_INTERVAL_HOURS),
            display_networks: parse_csv_var(ENV_DISPLAY_NETWORKS),
            display_studios: parse_csv_var(ENV_DISPLAY_STUDIOS),
            request_timeout_secs: non_empty_var(ENV_REQUEST_TIMEOUT_SECS),
            notification_capacity: non_empty_var(ENV_NOTIFICATION_CAPACITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_file() {
        let raw = r#"
            [service]
            url = "https://seerr.example.com"
            api_key = "abc"

            [refresh]
            interval_hours = 6

            [display]
            networks = ["HBO", "Netflix"]

            [http]
            request_timeout_secs = 15

            [notifications]
            capacity = 8
        "#;
        let file: FileConfig = toml::from_str(raw).unwrap();
        assert_eq!(file.service.url.as_deref(), Some("https://seerr.example.com"));
        assert_eq!(file.refresh.interval_hours, Some(6));
        assert_eq!(
            file.display.networks,
            Some(vec!["HBO".to_string(), "Netflix".to_string()])
        );
        assert!(file.display.studios.is_none());
        assert_eq!(file.http.request_timeout_secs, Some(15));
        assert_eq!(file.notifications.capacity, Some(8));
    }

    #[test]
    fn rejects_unknown_keys() {
        let raw = "[service]\nendpoint = \"https://x\"\n";
        assert!(toml::from_str::<FileConfig>(raw).is_err());
    }
}

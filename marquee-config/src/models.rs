use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{
    DEFAULT_DISPLAY_NETWORKS, DEFAULT_DISPLAY_STUDIOS,
    DEFAULT_NOTIFICATION_CAPACITY, DEFAULT_NOTIFICATION_DISPLAY_MS,
    DEFAULT_NOTIFICATION_EXIT_MS, DEFAULT_REFRESH_INTERVAL_HOURS,
};

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub refresh: RefreshConfig,
    pub display: DisplayConfig,
    pub http: HttpConfig,
    pub notifications: NotificationConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    /// Configuration with every optional field at its default.
    pub fn new(service_url: Url, api_key: impl Into<ApiKey>) -> Self {
        Self {
            service: ServiceConfig {
                url: service_url,
                api_key: api_key.into(),
            },
            refresh: RefreshConfig::default(),
            display: DisplayConfig::default(),
            http: HttpConfig::default(),
            notifications: NotificationConfig::default(),
            metadata: ConfigMetadata::default(),
        }
    }

    /// Whether replacing `old` with `new` must trigger an immediate catalog
    /// refresh: the refresh period or the service credentials changed.
    pub fn refresh_triggering_change(old: &Config, new: &Config) -> bool {
        old.refresh.interval_hours != new.refresh.interval_hours
            || old.service != new.service
    }
}

/// Location of and credential for the remote request service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub url: Url,
    pub api_key: ApiKey,
}

/// Static credential forwarded on every service call.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    pub interval_hours: NonZeroU32,
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_hours.get()) * 3_600)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_hours: NonZeroU32::new(DEFAULT_REFRESH_INTERVAL_HOURS)
                .unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// Ordered entity names shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub networks: Vec<String>,
    pub studios: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            networks: DEFAULT_DISPLAY_NETWORKS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            studios: DEFAULT_DISPLAY_STUDIOS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpConfig {
    /// `None` leaves timeouts to the transport.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub display: Duration,
    pub exit: Duration,
    pub capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display: Duration::from_millis(DEFAULT_NOTIFICATION_DISPLAY_MS),
            exit: Duration::from_millis(DEFAULT_NOTIFICATION_EXIT_MS),
            capacity: DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
    pub display_networks_defaulted: bool,
    pub display_studios_defaulted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(Url::parse("http://seerr.local:5055").unwrap(), "secret")
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = config();
        assert_eq!(config.refresh.interval(), Duration::from_secs(12 * 3_600));
        assert_eq!(config.notifications.display, Duration::from_millis(5_000));
        assert_eq!(config.notifications.exit, Duration::from_millis(500));
        assert_eq!(config.http.request_timeout, None);
        assert!(config.display.networks.iter().any(|n| n == "HBO"));
    }

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let rendered = format!("{:?}", config().service);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("ApiKey(***)"));
    }

    #[test]
    fn only_period_and_credential_changes_trigger_refresh() {
        let old = config();

        let mut display_only = old.clone();
        display_only.display.networks = vec!["HBO".into()];
        assert!(!Config::refresh_triggering_change(&old, &display_only));

        let mut new_key = old.clone();
        new_key.service.api_key = ApiKey::new("rotated");
        assert!(Config::refresh_triggering_change(&old, &new_key));

        let mut new_period = old.clone();
        new_period.refresh.interval_hours = NonZeroU32::new(6).unwrap();
        assert!(Config::refresh_triggering_change(&old, &new_period));
    }
}

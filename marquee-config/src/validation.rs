use std::collections::HashSet;

use thiserror::Error;

use crate::constants::LONG_REFRESH_INTERVAL_HOURS;
use crate::models::{Config, DisplayConfig};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error(
        "service URL is not configured; set MARQUEE_SERVICE_URL or [service].url"
    )]
    MissingServiceUrl,
    #[error("service URL `{value}` is invalid")]
    InvalidServiceUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("service URL scheme `{scheme}` is not supported; use http or https")]
    UnsupportedScheme { scheme: String },
    #[error(
        "API key is empty; set MARQUEE_API_KEY, MARQUEE_API_KEY_FILE or [service].api_key"
    )]
    EmptyApiKey,
    #[error("refresh interval must be a positive number of hours")]
    ZeroRefreshInterval,
    #[error("notification capacity must be at least 1")]
    ZeroNotificationCapacity,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

/// Reject unusable configuration and collect warnings for questionable values.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let url = &config.service.url;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigGuardRailError::UnsupportedScheme {
                scheme: other.to_string(),
            });
        }
    }

    if config.service.api_key.is_blank() {
        return Err(ConfigGuardRailError::EmptyApiKey);
    }

    if config.notifications.capacity == 0 {
        return Err(ConfigGuardRailError::ZeroNotificationCapacity);
    }

    if url.scheme() == "http" && !is_local_host(url) {
        warnings.push_with_hint(
            format!(
                "service URL {url} uses plain http; the API key is sent unencrypted"
            ),
            "Serve the request service over https or keep it on a private network",
        );
    }

    let hours = config.refresh.interval_hours.get();
    if hours > LONG_REFRESH_INTERVAL_HOURS {
        warnings.push_with_hint(
            format!("refresh interval of {hours}h is longer than a week"),
            "Catalogs can go stale for a long time; consider 12 or 24 hours",
        );
    }

    check_display_names(&config.display, &mut warnings);

    Ok(warnings)
}

fn check_display_names(display: &DisplayConfig, warnings: &mut ConfigWarnings) {
    for (label, names) in [
        ("display networks", &display.networks),
        ("display studios", &display.studios),
    ] {
        let mut seen = HashSet::new();
        for name in names {
            // Same folding as `CatalogEntity::matches_name`.
            let folded = name.trim().to_lowercase();
            if !seen.insert(folded) {
                warnings.push_with_hint(
                    format!("{label} list names `{name}` more than once"),
                    "Duplicates are shown once; remove the repeated entry",
                );
            }
        }
    }
}

fn is_local_host(url: &url::Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => {
            domain == "localhost" || domain.ends_with(".local")
        }
        Some(url::Host::Ipv4(ip)) => ip.is_loopback() || ip.is_private(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

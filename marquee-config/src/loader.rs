use std::{
    fs,
    num::NonZeroU32,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::constants::{
    DEFAULT_REFRESH_INTERVAL_HOURS, ENV_NOTIFICATION_CAPACITY,
    ENV_REFRESH_INTERVAL_HOURS, ENV_REQUEST_TIMEOUT_SECS,
};
use crate::models::{
    ApiKey, Config, ConfigMetadata, DisplayConfig, HttpConfig,
    NotificationConfig, RefreshConfig, ServiceConfig,
};
use crate::sources::{EnvConfig, FileConfig, FileServiceConfig};
use crate::validation::{self, ConfigGuardRailError, ConfigWarnings};

const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["marquee.toml", "config/marquee.toml"];

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Seed the process environment from a `.env` file, then load from the
    /// environment and configuration file.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut loaded = self.load_with_env(EnvConfig::gather())?;
        loaded.config.metadata.env_file_loaded = env_file_loaded;
        Ok(loaded)
    }

    /// Load using already gathered environment values. Does not touch
    /// `.env` files or the process environment.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            self.compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let mut source = ConfigPathSource::default();

        if let Some(explicit) = &self.options.config_path {
            source.explicit = Some(explicit.clone());
        } else if let Some(from_env) = &env_config.config_path {
            source.env = Some(from_env.clone());
        } else {
            source.default = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists());
        }

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((None, None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        debug!(path = %path.display(), ?provenance, "reading configuration file");
        let contents =
            fs::read_to_string(&path).map_err(|err| ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No marquee.toml detected; using environment variables only",
                "Create marquee.toml or pass --config to keep settings in one place",
            );
        }

        let FileConfig {
            service: file_service,
            refresh: file_refresh,
            display: file_display,
            http: file_http,
            notifications: file_notifications,
        } = file_config.unwrap_or_default();

        let service = ServiceConfig {
            url: resolve_service_url(&env, &file_service)?,
            api_key: resolve_api_key(&env, &file_service)?,
        };

        let interval_hours = parse_env::<u32>(
            ENV_REFRESH_INTERVAL_HOURS,
            env.refresh_interval_hours.as_deref(),
        )?
        .or(file_refresh.interval_hours)
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_HOURS);
        let refresh = RefreshConfig {
            interval_hours: NonZeroU32::new(interval_hours)
                .ok_or(ConfigGuardRailError::ZeroRefreshInterval)?,
        };

        let defaults = DisplayConfig::default();
        let networks = env.display_networks.or(file_display.networks);
        let studios = env.display_studios.or(file_display.studios);
        let metadata = ConfigMetadata {
            config_path,
            env_file_loaded: false,
            display_networks_defaulted: networks.is_none(),
            display_studios_defaulted: studios.is_none(),
        };
        let display = DisplayConfig {
            networks: networks.unwrap_or(defaults.networks),
            studios: studios.unwrap_or(defaults.studios),
        };

        let http = HttpConfig {
            request_timeout: parse_env::<u64>(
                ENV_REQUEST_TIMEOUT_SECS,
                env.request_timeout_secs.as_deref(),
            )?
            .or(file_http.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
        };

        let notification_defaults = NotificationConfig::default();
        let notifications = NotificationConfig {
            display: file_notifications
                .display_ms
                .map(Duration::from_millis)
                .unwrap_or(notification_defaults.display),
            exit: file_notifications
                .exit_ms
                .map(Duration::from_millis)
                .unwrap_or(notification_defaults.exit),
            capacity: parse_env::<usize>(
                ENV_NOTIFICATION_CAPACITY,
                env.notification_capacity.as_deref(),
            )?
            .or(file_notifications.capacity)
            .unwrap_or(notification_defaults.capacity),
        };

        let config = Config {
            service,
            refresh,
            display,
            http,
            notifications,
            metadata,
        };

        let guard_warnings = validation::apply_guard_rails(&config)?;
        warnings.extend(guard_warnings);

        Ok((config, warnings))
    }
}

fn resolve_service_url(
    env: &EnvConfig,
    file_service: &FileServiceConfig,
) -> Result<Url, ConfigLoadError> {
    let raw = env
        .service_url
        .clone()
        .or_else(|| file_service.url.clone())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigGuardRailError::MissingServiceUrl)?;

    let url = Url::parse(&raw).map_err(|source| {
        ConfigGuardRailError::InvalidServiceUrl {
            value: raw.clone(),
            source,
        }
    })?;
    Ok(url)
}

fn resolve_api_key(
    env: &EnvConfig,
    file_service: &FileServiceConfig,
) -> Result<ApiKey, ConfigLoadError> {
    if let Some(key) = env
        .api_key
        .clone()
        .filter(|value| !value.trim().is_empty())
    {
        return Ok(ApiKey::new(key.trim()));
    }

    for path in [env.api_key_file.as_ref(), file_service.api_key_file.as_ref()]
        .into_iter()
        .flatten()
    {
        if let Some(secret) = read_secret_file(path)? {
            return Ok(ApiKey::new(secret));
        }
    }

    file_service
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ApiKey::new)
        .ok_or(ConfigLoadError::GuardRail(ConfigGuardRailError::EmptyApiKey))
}

fn read_secret_file(path: &Path) -> Result<Option<String>, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::SecretFileIo {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn parse_env<T: FromStr>(
    name: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, ConfigLoadError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigLoadError::InvalidEnvValue {
                name,
                value: value.to_string(),
            })
    })
    .transpose()
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to read secret file {path}")]
    SecretFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("environment variable {name} has invalid value `{value}`")]
    InvalidEnvValue { name: &'static str, value: String },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

impl ConfigPathSource {
    fn resolved_path(&self) -> Option<(PathBuf, ConfigPathProvenance)> {
        if let Some(path) = &self.explicit {
            return Some((path.clone(), ConfigPathProvenance::Explicit));
        }
        if let Some(path) = &self.env {
            return Some((path.clone(), ConfigPathProvenance::Env));
        }
        if let Some(path) = &self.default {
            return Some((path.clone(), ConfigPathProvenance::Default));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(
            self,
            ConfigPathProvenance::Explicit | ConfigPathProvenance::Env
        )
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

//! Shared configuration library for Marquee.
//!
//! Configuration is layered from built-in defaults, an optional TOML file and
//! environment variables (optionally seeded from a `.env` file), then checked
//! by guard rails that reject unusable values and collect warnings for
//! questionable ones. The result is a strongly typed [`Config`].

pub mod constants;
pub mod loader;
pub mod models;
pub mod sources;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    ApiKey, Config, ConfigMetadata, DisplayConfig, HttpConfig,
    NotificationConfig, RefreshConfig, ServiceConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};

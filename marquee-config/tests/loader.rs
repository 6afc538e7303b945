use std::fs;
use std::time::Duration;

use marquee_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, EnvConfig,
};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("marquee.toml");
    fs::write(&path, contents).unwrap();
    path
}

fn env_with_credentials() -> EnvConfig {
    EnvConfig {
        service_url: Some("https://seerr.example.com".into()),
        api_key: Some("env-key".into()),
        ..EnvConfig::default()
    }
}

#[test]
fn environment_alone_produces_defaults() {
    let dir = TempDir::new().unwrap();
    let empty = write_config(&dir, "");
    let load = ConfigLoader::new()
        .with_config_path(&empty)
        .load_with_env(env_with_credentials())
        .unwrap();

    let config = load.config;
    assert_eq!(config.service.url.as_str(), "https://seerr.example.com/");
    assert_eq!(config.service.api_key.expose(), "env-key");
    assert_eq!(config.refresh.interval_hours.get(), 12);
    assert!(config.metadata.display_networks_defaulted);
    assert!(!config.display.networks.is_empty());
    assert_eq!(config.http.request_timeout, None);
    assert_eq!(config.notifications.capacity, 32);
}

#[test]
fn environment_overrides_file_values() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [service]
        url = "https://file.example.com"
        api_key = "file-key"

        [refresh]
        interval_hours = 6

        [display]
        networks = ["HBO", "Netflix"]
        studios = ["A24"]
        "#,
    );

    let env = EnvConfig {
        refresh_interval_hours: Some("3".into()),
        display_studios: Some(vec!["Pixar".into()]),
        ..env_with_credentials()
    };
    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env)
        .unwrap();

    let config = load.config;
    assert_eq!(config.service.url.host_str(), Some("seerr.example.com"));
    assert_eq!(config.service.api_key.expose(), "env-key");
    assert_eq!(config.refresh.interval_hours.get(), 3);
    assert_eq!(config.display.networks, vec!["HBO", "Netflix"]);
    assert_eq!(config.display.studios, vec!["Pixar"]);
    assert!(!config.metadata.display_networks_defaulted);
    assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
    assert!(load.warnings.is_empty());
}

#[test]
fn file_values_apply_without_environment() {
    let dir = TempDir::new().unwrap();
    let key_file = dir.path().join("api_key");
    fs::write(&key_file, "  from-secret-file \n").unwrap();
    let path = write_config(
        &dir,
        &format!(
            r#"
            [service]
            url = "http://localhost:5055"
            api_key_file = "{}"

            [http]
            request_timeout_secs = 20

            [notifications]
            display_ms = 3000
            exit_ms = 250
            capacity = 4
            "#,
            key_file.display()
        ),
    );

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(EnvConfig::default())
        .unwrap()
        .config;

    assert_eq!(config.service.api_key.expose(), "from-secret-file");
    assert_eq!(config.http.request_timeout, Some(Duration::from_secs(20)));
    assert_eq!(config.notifications.display, Duration::from_millis(3_000));
    assert_eq!(config.notifications.exit, Duration::from_millis(250));
    assert_eq!(config.notifications.capacity, 4);
}

#[test]
fn explicit_missing_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::new()
        .with_config_path(dir.path().join("nope.toml"))
        .load_with_env(env_with_credentials())
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn path_from_environment_must_exist() {
    let dir = TempDir::new().unwrap();
    let env = EnvConfig {
        config_path: Some(dir.path().join("nope.toml")),
        ..env_with_credentials()
    };
    let err = ConfigLoader::new().load_with_env(env).unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn malformed_toml_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[service\nurl = ");
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env_with_credentials())
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn missing_url_and_key_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let no_url = EnvConfig {
        api_key: Some("key".into()),
        ..EnvConfig::default()
    };
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(no_url)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::MissingServiceUrl)
    ));

    let no_key = EnvConfig {
        service_url: Some("https://seerr.example.com".into()),
        ..EnvConfig::default()
    };
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(no_key)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::EmptyApiKey)
    ));
}

#[test]
fn invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let bad_url = EnvConfig {
        service_url: Some("not a url".into()),
        ..env_with_credentials()
    };
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(bad_url)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::InvalidServiceUrl { .. })
    ));

    let zero_interval = EnvConfig {
        refresh_interval_hours: Some("0".into()),
        ..env_with_credentials()
    };
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(zero_interval)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::ZeroRefreshInterval)
    ));

    let not_a_number = EnvConfig {
        refresh_interval_hours: Some("twelve".into()),
        ..env_with_credentials()
    };
    let err = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(not_a_number)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::InvalidEnvValue {
            name: "MARQUEE_REFRESH_INTERVAL_HOURS",
            ..
        }
    ));
}

#[test]
fn remote_plain_http_is_a_warning_not_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");
    let env = EnvConfig {
        service_url: Some("http://seerr.example.com".into()),
        ..env_with_credentials()
    };
    let load = ConfigLoader::new()
        .with_config_path(&path)
        .load_with_env(env)
        .unwrap();
    assert_eq!(load.warnings.len(), 1);
    assert!(load.warnings.items[0].hint.is_some());
}

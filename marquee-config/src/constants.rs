//! Defaults and environment variable names.

pub const DEFAULT_REFRESH_INTERVAL_HOURS: u32 = 12;

/// Refresh periods above this are accepted but flagged.
pub const LONG_REFRESH_INTERVAL_HOURS: u32 = 24 * 7;

pub const DEFAULT_NOTIFICATION_DISPLAY_MS: u64 = 5_000;
pub const DEFAULT_NOTIFICATION_EXIT_MS: u64 = 500;
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 32;

/// Networks shown on the home screen when the user has not configured any.
pub const DEFAULT_DISPLAY_NETWORKS: &[&str] = &[
    "Netflix",
    "HBO",
    "Disney+",
    "Prime Video",
    "Apple TV+",
    "Hulu",
    "Paramount+",
    "Peacock",
    "BBC One",
    "AMC",
    "FX",
    "Showtime",
];

/// Studios shown on the home screen when the user has not configured any.
pub const DEFAULT_DISPLAY_STUDIOS: &[&str] = &[
    "Marvel Studios",
    "Lucasfilm Ltd.",
    "Pixar",
    "Walt Disney Pictures",
    "Warner Bros. Pictures",
    "Universal Pictures",
    "Paramount Pictures",
    "Columbia Pictures",
    "20th Century Studios",
    "Lionsgate",
    "A24",
    "DreamWorks Animation",
    "Studio Ghibli",
];

pub const ENV_CONFIG_PATH: &str = "MARQUEE_CONFIG_PATH";
pub const ENV_SERVICE_URL: &str = "MARQUEE_SERVICE_URL";
pub const ENV_API_KEY: &str = "MARQUEE_API_KEY";
pub const ENV_API_KEY_FILE: &str = "MARQUEE_API_KEY_FILE";
pub const ENV_REFRESH_INTERVAL_HOURS: &str = "MARQUEE_REFRESH_INTERVAL_HOURS";
pub const ENV_DISPLAY_NETWORKS: &str = "MARQUEE_DISPLAY_NETWORKS";
pub const ENV_DISPLAY_STUDIOS: &str = "MARQUEE_DISPLAY_STUDIOS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "MARQUEE_REQUEST_TIMEOUT_SECS";
pub const ENV_NOTIFICATION_CAPACITY: &str = "MARQUEE_NOTIFICATION_CAPACITY";

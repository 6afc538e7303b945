//! Image reference helpers.
//!
//! The service returns poster and logo references either as bare TMDB paths
//! (`/abc.jpg`) or as absolute URLs. Bare paths are expanded against the TMDB
//! image CDN.

const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PosterSize {
    W92,
    W154,
    W185,
    W342,
    #[default]
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
            PosterSize::Original => "original",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogoSize {
    W92,
    W154,
    W185,
    #[default]
    W300,
    W500,
    Original,
}

impl LogoSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoSize::W92 => "w92",
            LogoSize::W154 => "w154",
            LogoSize::W185 => "w185",
            LogoSize::W300 => "w300",
            LogoSize::W500 => "w500",
            LogoSize::Original => "original",
        }
    }
}

/// Expand an image reference into a fetchable URL.
///
/// Returns `None` for empty references.
pub fn resolve_image_ref(raw: &str, size: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }
    let path = raw.trim_start_matches('/');
    Some(format!("{TMDB_IMAGE_BASE}/{size}/{path}"))
}

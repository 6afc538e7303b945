use marquee_model::{CatalogKind, EntityId, IdentityKey};
use reqwest::Method;
use url::Url;

use crate::error::ApiError;

/// Route templates of the remote request service.
pub mod paths {
    pub const NETWORKS: &str = "/networks";
    pub const STUDIOS: &str = "/studios";
    pub const NETWORK_CONTENT: &str = "/network/{id}/content";
    pub const STUDIO_CONTENT: &str = "/studio/{id}/content";
    pub const REQUEST: &str = "/request";
    pub const SEARCH_STATUS: &str = "/search/status";
}

/// A concrete call target on the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Catalog(CatalogKind),
    EntityContent { kind: CatalogKind, id: EntityId },
    Request,
    SearchStatus(IdentityKey),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Request => Method::POST,
            _ => Method::GET,
        }
    }

    /// Route template, used for logging without leaking ids.
    pub fn template(&self) -> &'static str {
        match self {
            Endpoint::Catalog(CatalogKind::Networks) => paths::NETWORKS,
            Endpoint::Catalog(CatalogKind::Studios) => paths::STUDIOS,
            Endpoint::EntityContent {
                kind: CatalogKind::Networks,
                ..
            } => paths::NETWORK_CONTENT,
            Endpoint::EntityContent {
                kind: CatalogKind::Studios,
                ..
            } => paths::STUDIO_CONTENT,
            Endpoint::Request => paths::REQUEST,
            Endpoint::SearchStatus(_) => paths::SEARCH_STATUS,
        }
    }

    fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::Catalog(kind) => vec![catalog_segment(*kind)],
            Endpoint::EntityContent { kind, id } => {
                vec![kind.segment(), id.as_str(), "content"]
            }
            Endpoint::Request => vec!["request"],
            Endpoint::SearchStatus(_) => vec!["search", "status"],
        }
    }

    /// Resolve against the service base URL. Any path on the base URL is kept
    /// as a prefix; ids are percent-encoded as single path segments.
    pub fn url(&self, base: &Url) -> Result<Url, ApiError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::InvalidRequest(format!(
                    "service URL {base} cannot carry a path"
                ))
            })?;
            segments.pop_if_empty();
            segments.extend(self.segments());
        }

        if let Endpoint::SearchStatus(key) = self {
            url.query_pairs_mut()
                .append_pair("tmdbId", &key.id.to_string())
                .append_pair("mediaType", key.media_type.as_wire());
        }

        Ok(url)
    }
}

fn catalog_segment(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Networks => "networks",
        CatalogKind::Studios => "studios",
    }
}

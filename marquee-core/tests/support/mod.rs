#![allow(dead_code)]

use std::sync::Arc;

use marquee_config::{Config, DisplayConfig};
use marquee_core::Engine;
use marquee_core::model::{
    Availability, CatalogEntity, CatalogKind, ContentGroups, ContentItem,
    MediaId, MediaType,
};
use marquee_core::testing::StubCatalogApi;
use url::Url;

pub fn config() -> Config {
    Config::new(
        Url::parse("http://seerr.local:5055/api/v1").unwrap(),
        "test-key",
    )
}

pub fn config_with_display(networks: &[&str], studios: &[&str]) -> Config {
    let mut config = config();
    config.display = DisplayConfig {
        networks: networks.iter().map(|name| name.to_string()).collect(),
        studios: studios.iter().map(|name| name.to_string()).collect(),
    };
    config
}

pub fn entities(entries: &[(u64, &str)]) -> Vec<CatalogEntity> {
    entries
        .iter()
        .map(|(id, name)| CatalogEntity::new(*id, *name))
        .collect()
}

pub fn movie(id: u64, title: &str, availability: Availability) -> ContentItem {
    ContentItem {
        id: MediaId(id),
        media_type: MediaType::Movie,
        title: title.to_string(),
        poster_ref: None,
        release_date: None,
        library_ref: None,
        availability,
    }
}

pub fn series(id: u64, title: &str, availability: Availability) -> ContentItem {
    ContentItem {
        media_type: MediaType::Series,
        ..movie(id, title, availability)
    }
}

/// Stub with a small networks and studios catalog.
pub fn seeded_stub() -> StubCatalogApi {
    let stub = StubCatalogApi::new();
    stub.set_catalog(
        CatalogKind::Networks,
        entities(&[(1, "HBO"), (2, "Netflix"), (7, "AMC")]),
    );
    stub.set_catalog(CatalogKind::Studios, entities(&[(41, "A24"), (3, "Pixar")]));
    stub
}

pub fn engine(stub: &StubCatalogApi, config: Config) -> Engine {
    Engine::with_api(config, Arc::new(stub.clone())).unwrap()
}

pub fn groups(movies: Vec<ContentItem>, series: Vec<ContentItem>) -> ContentGroups {
    ContentGroups { movies, series }
}

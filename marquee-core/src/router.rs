//! Navigation path resolution and view dispatch.

use std::fmt;
use std::sync::Arc;

use marquee_config::DisplayConfig;
use marquee_model::{
    Availability, CatalogEntity, CatalogKind, ContentGroups, ContentItem, EntityId,
};
use parking_lot::RwLock;
use tracing::debug;

use crate::catalog::CatalogCache;
use crate::content::ContentFetcher;
use crate::requests::{AvailabilityStore, Representation};

/// Navigation surface.
pub mod paths {
    pub const HOME: &[&str] = &["", "/", "/home", "/home.html"];
    pub const BROWSE: &str = "/browse";
    pub const NETWORK_PREFIX: &str = "/network/";
    pub const STUDIO_PREFIX: &str = "/studio/";
}

/// View selected by a navigation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewDescriptor {
    Home,
    BrowseAll,
    NetworkDetail(EntityId),
    StudioDetail(EntityId),
    Unrecognized,
}

impl ViewDescriptor {
    /// Catalog and id of a detail view.
    pub fn detail(&self) -> Option<(CatalogKind, &EntityId)> {
        match self {
            ViewDescriptor::NetworkDetail(id) => Some((CatalogKind::Networks, id)),
            ViewDescriptor::StudioDetail(id) => Some((CatalogKind::Studios, id)),
            _ => None,
        }
    }

    /// Canonical path of the view; `None` for unrecognized paths.
    pub fn path(&self) -> Option<String> {
        match self {
            ViewDescriptor::Home => Some("/".to_string()),
            ViewDescriptor::BrowseAll => Some(paths::BROWSE.to_string()),
            ViewDescriptor::NetworkDetail(id) => {
                Some(format!("{}{id}", paths::NETWORK_PREFIX))
            }
            ViewDescriptor::StudioDetail(id) => {
                Some(format!("{}{id}", paths::STUDIO_PREFIX))
            }
            ViewDescriptor::Unrecognized => None,
        }
    }
}

impl fmt::Display for ViewDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewDescriptor::Home => f.write_str("home"),
            ViewDescriptor::BrowseAll => f.write_str("browse all"),
            ViewDescriptor::NetworkDetail(id) => write!(f, "network {id}"),
            ViewDescriptor::StudioDetail(id) => write!(f, "studio {id}"),
            ViewDescriptor::Unrecognized => f.write_str("unrecognized"),
        }
    }
}

/// Map a navigation path to a view. Pure; performs no I/O.
///
/// A leading `#` and then a leading `!` are stripped. A detail id is the
/// segment after the prefix, up to the next `/`, `?` or `#`.
pub fn resolve(path: &str) -> ViewDescriptor {
    let path = path.trim();
    let path = path.strip_prefix('#').unwrap_or(path);
    let path = path.strip_prefix('!').unwrap_or(path);
    let route = path.split(['?', '#']).next().unwrap_or_default();

    if paths::HOME.iter().any(|home| *home == route) {
        return ViewDescriptor::Home;
    }
    if route == paths::BROWSE {
        return ViewDescriptor::BrowseAll;
    }
    if let Some(rest) = route.strip_prefix(paths::NETWORK_PREFIX) {
        return entity_segment(rest)
            .map(ViewDescriptor::NetworkDetail)
            .unwrap_or(ViewDescriptor::Unrecognized);
    }
    if let Some(rest) = route.strip_prefix(paths::STUDIO_PREFIX) {
        return entity_segment(rest)
            .map(ViewDescriptor::StudioDetail)
            .unwrap_or(ViewDescriptor::Unrecognized);
    }
    ViewDescriptor::Unrecognized
}

fn entity_segment(rest: &str) -> Option<EntityId> {
    let segment = rest.split('/').next()?;
    EntityId::new(segment).ok()
}

/// Entities of both catalogs, as shown by the home and browse views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityListing {
    pub networks: Vec<CatalogEntity>,
    pub studios: Vec<CatalogEntity>,
}

/// One rendered item bound to its live availability.
#[derive(Debug, Clone)]
pub struct ContentCard {
    pub item: ContentItem,
    representation: Representation,
}

impl ContentCard {
    pub fn availability(&self) -> Availability {
        self.representation.availability()
    }

    pub fn shows_request_affordance(&self) -> bool {
        self.representation.shows_request_affordance()
    }

    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    /// Item with its availability brought up to date.
    pub fn current_item(&self) -> ContentItem {
        ContentItem {
            availability: self.availability(),
            ..self.item.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub enum ContentState {
    Loaded {
        movies: Vec<ContentCard>,
        series: Vec<ContentCard>,
    },
    /// The fetch failed; the view renders a degraded result.
    Failed { message: String },
}

impl ContentState {
    pub fn cards(&self) -> impl Iterator<Item = &ContentCard> {
        let (movies, series): (&[ContentCard], &[ContentCard]) = match self {
            ContentState::Loaded { movies, series } => {
                (movies.as_slice(), series.as_slice())
            }
            ContentState::Failed { .. } => (&[], &[]),
        };
        movies.iter().chain(series.iter())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ContentState::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub kind: CatalogKind,
    pub entity: CatalogEntity,
    pub content: ContentState,
}

/// Terminal result of one navigation.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    Home(EntityListing),
    BrowseAll(EntityListing),
    Detail(DetailView),
    /// The id is absent from the local catalog; no fetch was made.
    NotFound { kind: CatalogKind, id: EntityId },
    /// The path is not a Marquee view; the current view stays as is.
    Unchanged,
}

#[derive(Debug)]
pub struct ViewRouter {
    cache: Arc<CatalogCache>,
    fetcher: ContentFetcher,
    store: Arc<AvailabilityStore>,
    display: RwLock<DisplayConfig>,
}

impl ViewRouter {
    pub fn new(
        cache: Arc<CatalogCache>,
        fetcher: ContentFetcher,
        store: Arc<AvailabilityStore>,
        display: DisplayConfig,
    ) -> Self {
        Self {
            cache,
            fetcher,
            store,
            display: RwLock::new(display),
        }
    }

    /// Display lists are read at render time, so a change applies on the
    /// next navigation without a refresh.
    pub fn set_display(&self, display: DisplayConfig) {
        *self.display.write() = display;
    }

    /// Configured display entities, in configured order.
    pub fn home(&self) -> EntityListing {
        let display = self.display.read().clone();
        EntityListing {
            networks: self
                .cache
                .snapshot(CatalogKind::Networks)
                .select_by_names(&display.networks),
            studios: self
                .cache
                .snapshot(CatalogKind::Studios)
                .select_by_names(&display.studios),
        }
    }

    pub fn browse_all(&self) -> EntityListing {
        EntityListing {
            networks: self.cache.snapshot(CatalogKind::Networks).sorted_by_name(),
            studios: self.cache.snapshot(CatalogKind::Studios).sorted_by_name(),
        }
    }

    pub async fn navigate(&self, path: &str) -> RouteOutcome {
        let view = resolve(path);
        debug!(path, %view, "navigation");

        match view {
            ViewDescriptor::Home => RouteOutcome::Home(self.home()),
            ViewDescriptor::BrowseAll => RouteOutcome::BrowseAll(self.browse_all()),
            ViewDescriptor::NetworkDetail(id) => {
                self.detail(CatalogKind::Networks, id).await
            }
            ViewDescriptor::StudioDetail(id) => {
                self.detail(CatalogKind::Studios, id).await
            }
            ViewDescriptor::Unrecognized => RouteOutcome::Unchanged,
        }
    }

    async fn detail(&self, kind: CatalogKind, id: EntityId) -> RouteOutcome {
        let Some(entity) = self.cache.get(kind, &id) else {
            debug!(%kind, %id, "entity not in catalog");
            return RouteOutcome::NotFound { kind, id };
        };

        let content = match self.fetcher.fetch_for_entity(kind, &id).await {
            Ok(groups) => self.bind(groups),
            Err(error) => ContentState::Failed {
                message: error.to_string(),
            },
        };

        RouteOutcome::Detail(DetailView {
            kind,
            entity,
            content,
        })
    }

    fn bind(&self, groups: ContentGroups) -> ContentState {
        self.store.prune();
        let ContentGroups { movies, series } = groups;
        ContentState::Loaded {
            movies: movies.into_iter().map(|item| self.card(item)).collect(),
            series: series.into_iter().map(|item| self.card(item)).collect(),
        }
    }

    fn card(&self, item: ContentItem) -> ContentCard {
        let representation = self.store.attach(&item);
        ContentCard {
            item,
            representation,
        }
    }
}

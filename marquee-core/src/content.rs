use std::sync::Arc;

use marquee_model::{CatalogKind, ContentGroups, EntityId};
use tracing::{debug, warn};

use crate::api::CatalogApi;
use crate::error::ApiError;

/// Retrieves the content list of one catalog entity.
///
/// Nothing is cached: every call goes to the service.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    api: Arc<dyn CatalogApi>,
}

impl ContentFetcher {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    pub async fn fetch_for_entity(
        &self,
        kind: CatalogKind,
        id: &EntityId,
    ) -> Result<ContentGroups, ApiError> {
        match self.api.list_content_for_entity(kind, id).await {
            Ok(groups) => {
                debug!(
                    %kind,
                    %id,
                    movies = groups.movies.len(),
                    series = groups.series.len(),
                    "fetched entity content"
                );
                Ok(groups)
            }
            Err(error) => {
                warn!(%kind, %id, %error, "entity content fetch failed");
                Err(error)
            }
        }
    }
}

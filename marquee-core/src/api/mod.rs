//! Remote request service client.

pub mod client;
pub mod routes;
pub mod types;

use async_trait::async_trait;
use marquee_model::{
    Availability, CatalogEntity, CatalogKind, ContentGroups, EntityId,
    IdentityKey,
};

use crate::error::ApiError;

pub use client::HttpCatalogClient;
pub use routes::Endpoint;
pub use types::RequestAck;

/// Typed operations offered by the remote request service.
#[async_trait]
pub trait CatalogApi: Send + Sync + std::fmt::Debug {
    async fn list_networks(&self) -> Result<Vec<CatalogEntity>, ApiError>;

    async fn list_studios(&self) -> Result<Vec<CatalogEntity>, ApiError>;

    /// Movies and series associated with one catalog entity.
    async fn list_content_for_entity(
        &self,
        kind: CatalogKind,
        id: &EntityId,
    ) -> Result<ContentGroups, ApiError>;

    async fn submit_request(
        &self,
        key: IdentityKey,
    ) -> Result<RequestAck, ApiError>;

    /// Availability the service currently reports for an external id.
    async fn check_library_status(
        &self,
        key: IdentityKey,
    ) -> Result<Availability, ApiError>;

    async fn list_catalog(
        &self,
        kind: CatalogKind,
    ) -> Result<Vec<CatalogEntity>, ApiError> {
        match kind {
            CatalogKind::Networks => self.list_networks().await,
            CatalogKind::Studios => self.list_studios().await,
        }
    }
}

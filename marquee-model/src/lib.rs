//! Core data model definitions shared across Marquee crates.
#![allow(missing_docs)]

pub mod availability;
pub mod catalog;
pub mod content;
pub mod error;
pub mod ids;
pub mod image;
pub mod media_type;
pub mod prelude;

// Intentionally curated re-exports for downstream consumers.
pub use availability::{Availability, MediaStatus};
pub use catalog::{CatalogEntity, CatalogKind, fold_name};
pub use content::{ContentGroups, ContentItem, IdentityKey};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{EntityId, MediaId};
pub use image::{LogoSize, PosterSize, resolve_image_ref};
pub use media_type::MediaType;

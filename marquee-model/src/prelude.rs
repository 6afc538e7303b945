//! Flat snapshot of the model surface.
//! Prefer importing from this module in engine and presentation code.

pub use super::availability::{Availability, MediaStatus};
pub use super::catalog::{CatalogEntity, CatalogKind};
pub use super::content::{ContentGroups, ContentItem, IdentityKey};
pub use super::ids::{EntityId, MediaId};
pub use super::image::{LogoSize, PosterSize};
pub use super::media_type::MediaType;

//! Wire shapes of the remote request service and their conversion into the
//! shared model.

use chrono::NaiveDate;
use marquee_model::{
    Availability, CatalogEntity, ContentGroups, ContentItem, EntityId,
    IdentityKey, LogoSize, MediaId, MediaStatus, MediaType, PosterSize,
    resolve_image_ref,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEntity {
    pub id: EntityId,
    pub name: String,
    #[serde(default, alias = "logoPath", alias = "logo_path")]
    pub logo_ref: Option<String>,
}

impl From<WireEntity> for CatalogEntity {
    fn from(wire: WireEntity) -> Self {
        let logo_ref = wire
            .logo_ref
            .as_deref()
            .and_then(|raw| resolve_image_ref(raw, LogoSize::default().as_str()));
        CatalogEntity {
            id: wire.id,
            name: wire.name,
            logo_ref,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireMediaInfo {
    #[serde(default)]
    pub status: Option<u8>,
}

/// A movie or series as the service reports it. Movies carry `title` and
/// `releaseDate`, series carry `name` and `firstAirDate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContentItem {
    pub id: MediaId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "posterPath")]
    pub poster_ref: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub library_ref: Option<String>,
    #[serde(default)]
    pub media_info: Option<WireMediaInfo>,
}

impl WireContentItem {
    pub fn into_item(self, media_type: MediaType) -> ContentItem {
        let status = self
            .media_info
            .and_then(|info| info.status)
            .map(MediaStatus::from_code);
        let library_ref = self.library_ref.filter(|r| !r.trim().is_empty());
        let availability = Availability::derive(status, library_ref.is_some());

        let title = self
            .title
            .or(self.name)
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| format!("Untitled ({})", self.id));

        ContentItem {
            id: self.id,
            media_type,
            title,
            poster_ref: self.poster_ref.as_deref().and_then(|raw| {
                resolve_image_ref(raw, PosterSize::default().as_str())
            }),
            release_date: self
                .release_date
                .or(self.first_air_date)
                .as_deref()
                .and_then(parse_release_date),
            library_ref,
            availability,
        }
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContentResponse {
    #[serde(default)]
    pub movies: Vec<WireContentItem>,
    #[serde(default, alias = "series")]
    pub tv_shows: Vec<WireContentItem>,
}

impl From<WireContentResponse> for ContentGroups {
    fn from(wire: WireContentResponse) -> Self {
        ContentGroups {
            movies: wire
                .movies
                .into_iter()
                .map(|item| item.into_item(MediaType::Movie))
                .collect(),
            series: wire
                .tv_shows
                .into_iter()
                .map(|item| item.into_item(MediaType::Series))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestBody {
    pub media_id: MediaId,
    pub media_type: MediaType,
}

impl From<IdentityKey> for SubmitRequestBody {
    fn from(key: IdentityKey) -> Self {
        Self {
            media_id: key.id,
            media_type: key.media_type,
        }
    }
}

/// Acknowledgment of an accepted request. The service body is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAck {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub status: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLibraryStatus {
    #[serde(default)]
    pub media_info: Option<WireMediaInfo>,
    #[serde(default)]
    pub library_ref: Option<String>,
}

impl From<WireLibraryStatus> for Availability {
    fn from(wire: WireLibraryStatus) -> Self {
        let status = wire
            .media_info
            .and_then(|info| info.status)
            .map(MediaStatus::from_code);
        let in_library = wire
            .library_ref
            .is_some_and(|reference| !reference.trim().is_empty());
        Availability::derive(status, in_library)
    }
}

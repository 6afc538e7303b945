use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;

use crate::availability::Availability;
use crate::ids::MediaId;
use crate::media_type::MediaType;

/// Identity of a content item across every representation that shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentityKey {
    pub id: MediaId,
    pub media_type: MediaType,
}

impl IdentityKey {
    pub fn new(id: impl Into<MediaId>, media_type: MediaType) -> Self {
        Self {
            id: id.into(),
            media_type,
        }
    }
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.media_type.as_wire(), self.id)
    }
}

/// A movie or series associated with a catalog entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ContentItem {
    pub id: MediaId,
    pub media_type: MediaType,
    pub title: String,
    pub poster_ref: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// Present only when the item already exists in the local library.
    pub library_ref: Option<String>,
    pub availability: Availability,
}

impl ContentItem {
    pub fn key(&self) -> IdentityKey {
        IdentityKey::new(self.id, self.media_type)
    }

    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|date| date.year())
    }
}

/// Content of one catalog entity, split by media type.
///
/// Both groups are always present; hiding an empty group is a presentation
/// decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentGroups {
    pub movies: Vec<ContentItem>,
    pub series: Vec<ContentItem>,
}

impl ContentGroups {
    /// Partition a mixed list by media type, preserving relative order.
    pub fn partition(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let (movies, series) = items
            .into_iter()
            .partition(|item| item.media_type == MediaType::Movie);
        Self { movies, series }
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.series.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentItem> {
        self.movies.iter().chain(self.series.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, media_type: MediaType) -> ContentItem {
        ContentItem {
            id: MediaId(id),
            media_type,
            title: format!("Item {id}"),
            poster_ref: None,
            release_date: NaiveDate::from_ymd_opt(2020, 5, 17),
            library_ref: None,
            availability: Availability::NotAvailable,
        }
    }

    #[test]
    fn partition_keeps_both_groups_even_when_empty() {
        let groups = ContentGroups::partition(vec![
            item(1, MediaType::Movie),
            item(2, MediaType::Movie),
        ]);
        assert_eq!(groups.movies.len(), 2);
        assert!(groups.series.is_empty());
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn identity_key_distinguishes_media_types() {
        let movie = item(42, MediaType::Movie).key();
        let series = item(42, MediaType::Series).key();
        assert_ne!(movie, series);
        assert_eq!(movie.to_string(), "movie:42");
        assert_eq!(item(42, MediaType::Movie).release_year(), Some(2020));
    }
}

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;

/// Kind of requestable media.
///
/// On the wire the service speaks `"movie"` and `"tv"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaType {
    /// Movie media type
    #[cfg_attr(feature = "serde", serde(rename = "movie"))]
    Movie,
    /// Series media type
    #[cfg_attr(feature = "serde", serde(rename = "tv"))]
    Series,
}

impl MediaType {
    /// Wire representation used in request bodies and query strings.
    pub fn as_wire(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "tv",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Series => write!(f, "Series"),
        }
    }
}

impl FromStr for MediaType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaType::Movie),
            "tv" | "series" | "show" => Ok(MediaType::Series),
            other => Err(ModelError::UnknownMediaType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_and_human_names() {
        assert_eq!("tv".parse::<MediaType>().unwrap(), MediaType::Series);
        assert_eq!("Movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert!("episode".parse::<MediaType>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_to_service_names() {
        assert_eq!(
            serde_json::to_string(&MediaType::Series).unwrap(),
            "\"tv\""
        );
        assert_eq!(MediaType::Movie.as_wire(), "movie");
    }
}

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Opaque identifier of a catalog entity (network or studio).
///
/// The remote service hands these out as JSON numbers, navigation paths carry
/// them as text, so the identifier is kept as its canonical string form and
/// never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidId(
                "entity id cannot be empty".to_string(),
            ));
        }
        if trimmed.contains('/') {
            return Err(ModelError::InvalidId(format!(
                "entity id `{trimmed}` cannot contain a path separator"
            )));
        }
        Ok(EntityId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        EntityId(value.to_string())
    }
}

impl FromStr for EntityId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityId::new(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EntityId {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(numeric) => serializer.serialize_u64(numeric),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EntityId {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(EntityId::from(n)),
            Raw::Text(s) => EntityId::new(s).map_err(serde::de::Error::custom),
        }
    }
}

/// External (TMDB) identifier of a movie or series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MediaId(pub u64);

impl MediaId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MediaId {
    fn from(value: u64) -> Self {
        MediaId(value)
    }
}

impl FromStr for MediaId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(MediaId).map_err(|_| {
            ModelError::InvalidId(format!("`{s}` is not a numeric media id"))
        })
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_rejects_blank_and_nested_paths() {
        assert!(EntityId::new("   ").is_err());
        assert!(EntityId::new("7/content").is_err());
        assert_eq!(EntityId::new(" 7 ").unwrap().as_str(), "7");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn entity_id_accepts_numbers_and_strings_on_the_wire() {
        let from_number: EntityId = serde_json::from_str("213").unwrap();
        let from_text: EntityId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(from_number, EntityId::from(213));
        assert_eq!(from_text.as_str(), "abc");
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "213");
    }

    #[test]
    fn media_id_parses_numeric_text() {
        assert_eq!("42".parse::<MediaId>().unwrap(), MediaId(42));
        assert!("forty-two".parse::<MediaId>().is_err());
    }
}

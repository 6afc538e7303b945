use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;
use crate::ids::EntityId;

/// The two disjoint reference catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CatalogKind {
    Networks,
    Studios,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 2] = [CatalogKind::Networks, CatalogKind::Studios];

    /// Singular path segment used by both navigation and service routes.
    pub fn segment(&self) -> &'static str {
        match self {
            CatalogKind::Networks => "network",
            CatalogKind::Studios => "studio",
        }
    }
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Networks => write!(f, "networks"),
            CatalogKind::Studios => write!(f, "studios"),
        }
    }
}

impl FromStr for CatalogKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "network" | "networks" => Ok(CatalogKind::Networks),
            "studio" | "studios" => Ok(CatalogKind::Studios),
            other => Err(ModelError::UnknownCatalog(other.to_string())),
        }
    }
}

/// A named network or studio.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CatalogEntity {
    pub id: EntityId,
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub logo_ref: Option<String>,
}

impl CatalogEntity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            logo_ref: None,
        }
    }

    pub fn with_logo(mut self, logo_ref: impl Into<String>) -> Self {
        self.logo_ref = Some(logo_ref.into());
        self
    }

    /// Case-insensitive, whitespace-trimmed name comparison used when
    /// matching configured display lists against the catalog.
    pub fn matches_name(&self, name: &str) -> bool {
        fold_name(&self.name) == fold_name(name)
    }
}

/// Trimmed, Unicode lowercased form of an entity name.
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_path_segment() {
        for kind in CatalogKind::ALL {
            assert_eq!(kind.segment().parse::<CatalogKind>().unwrap(), kind);
        }
    }

    #[test]
    fn name_matching_ignores_case_and_padding() {
        let hbo = CatalogEntity::new(1, "HBO");
        assert!(hbo.matches_name("  hbo "));
        assert!(!hbo.matches_name("HBO Max"));
    }

    #[test]
    fn name_matching_folds_non_ascii_case() {
        let canal = CatalogEntity::new(9, "ÉCRAN Télé");
        assert!(canal.matches_name("écran télé"));
        assert!(CatalogEntity::new(10, "Ørsted TV").matches_name(" ØRSTED tv"));
        assert_eq!(fold_name(" ÉCRAN "), "écran");
    }
}

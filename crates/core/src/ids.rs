use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Public handle for a show: the provider-native numeric id plus a
/// human-readable slug, formatted as `"{id}-{slug}"`.
///
/// The string form is opaque to callers but must round-trip: parsing it
/// back recovers the numeric id used for detail/episode/video requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ShowId {
    pub id: u32,
    pub slug: String,
}

impl ShowId {
    pub fn new(id: u32, slug: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
        }
    }
}

impl std::fmt::Display for ShowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.slug.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}-{}", self.id, self.slug)
        }
    }
}

impl std::str::FromStr for ShowId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, slug) = match s.split_once('-') {
            Some((head, slug)) => (head, slug),
            None => (s, ""),
        };
        let id: u32 = head
            .parse()
            .map_err(|_| CatalogError::InvalidId(s.to_string()))?;
        Ok(Self::new(id, slug))
    }
}

impl From<ShowId> for String {
    fn from(id: ShowId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ShowId {
    type Error = CatalogError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A show handle optionally narrowed to one playable episode
/// (`"{id}-{slug}/{episodeId}"`). Movies carry only the show part;
/// their playable media id is discovered by fetching episode 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaId {
    Show(ShowId),
    Episode(ShowId, u64),
}

impl MediaId {
    pub fn show(&self) -> &ShowId {
        match self {
            Self::Show(id) => id,
            Self::Episode(id, _) => id,
        }
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Show(id) => write!(f, "{id}"),
            Self::Episode(id, ep) => write!(f, "{id}/{ep}"),
        }
    }
}

impl std::str::FromStr for MediaId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((show, episode)) => {
                let episode: u64 = episode
                    .parse()
                    .map_err(|_| CatalogError::InvalidId(s.to_string()))?;
                Ok(Self::Episode(show.parse()?, episode))
            }
            None => Ok(Self::Show(s.parse()?)),
        }
    }
}

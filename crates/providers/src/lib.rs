//! Upstream provider clients.
//!
//! One module per source: the primary catalog (AnimeUnity) plus the
//! enrichment sources (Jikan/MyAnimeList, AniList, Kitsu). Every client
//! normalizes the provider's raw JSON into the fixed structs below; raw
//! provider records never cross this boundary.

pub mod anilist;
pub mod animeunity;
pub mod html;
pub mod jikan;
pub mod kitsu;
pub mod source;

use aniteca_core::{ShowKind, ShowStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
    #[error("provider error: {0}")]
    Provider(String),
}

/// Minimal listing record from the primary catalog (search and archive).
#[derive(Debug, Clone)]
pub struct PrimaryShowEntry {
    pub id: u32,
    pub slug: String,
    /// Raw title, possibly carrying a dub marker like `(ITA)`.
    pub title: String,
    pub kind: ShowKind,
    pub poster_url: Option<String>,
    pub year: Option<i32>,
    pub dubbed: bool,
}

/// Full detail record from the primary catalog.
#[derive(Debug, Clone)]
pub struct PrimaryShow {
    pub id: u32,
    pub slug: String,
    pub title: String,
    pub kind: ShowKind,
    pub poster_url: Option<String>,
    pub cover_url: Option<String>,
    pub plot: Option<String>,
    pub score: Option<f64>,
    pub genres: Vec<String>,
    pub episodes_count: u32,
    /// Average episode runtime in minutes.
    pub episode_runtime: Option<u32>,
    pub year: Option<i32>,
    /// Broadcast cour name (Inverno/Primavera/Estate/Autunno).
    pub cour: Option<String>,
    pub status: Option<ShowStatus>,
    /// Cross-reference ids carried by the primary record, used to key
    /// enrichment lookups.
    pub mal_id: Option<u32>,
    pub anilist_id: Option<u32>,
    pub suggested: Vec<PrimaryShowEntry>,
    pub related: Vec<PrimaryShowEntry>,
}

/// One episode row from the primary catalog's flat episode index.
#[derive(Debug, Clone)]
pub struct PrimaryEpisode {
    pub id: u64,
    /// Raw episode number; may be a range like `"135-136"`.
    pub number: String,
}

/// Show-level enrichment from MyAnimeList (via Jikan).
#[derive(Debug, Clone, Default)]
pub struct MalShow {
    pub poster_url: Option<String>,
    pub score: Option<f64>,
}

/// Episode-level enrichment from MyAnimeList: titles and filler flags.
#[derive(Debug, Clone)]
pub struct MalEpisode {
    pub number: u32,
    pub title: Option<String>,
    pub filler: Option<bool>,
}

/// Show-level enrichment from AniList: banner and textless cover art.
#[derive(Debug, Clone, Default)]
pub struct AnilistShow {
    pub banner_url: Option<String>,
    pub cover_url: Option<String>,
}

/// Episode thumbnail from AniList streaming episodes.
#[derive(Debug, Clone)]
pub struct AnilistEpisode {
    pub number: u32,
    pub thumbnail_url: Option<String>,
}

/// Show-level enrichment from Kitsu: cover artwork.
#[derive(Debug, Clone, Default)]
pub struct KitsuShow {
    pub cover_url: Option<String>,
}

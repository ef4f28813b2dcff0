use std::collections::HashMap;

use aniteca_core::{FeedCategory, ShowId, ShowKind, ShowStatus};
use serde::{Deserialize, Serialize};

/// Minimal listing record, produced by search and archive listing.
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowEntry {
    pub kind: ShowKind,
    pub id: ShowId,
    pub title: String,
    pub poster_url: Option<String>,
    pub year: Option<i32>,
    /// ISO 639-1 language code of the audio track.
    pub language: Option<String>,
}

/// Derived episode-index grouping of fixed size. Not provided by any
/// upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub number: u32,
    /// Display range, e.g. `"1-100"`.
    pub name: String,
}

/// Full show detail, built once per request by merging the primary record
/// with zero or more enrichment records. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub kind: ShowKind,
    pub title: String,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    /// Episode duration in seconds.
    pub duration: u32,
    pub release_date: Option<String>,
    pub seasons: Option<Vec<Season>>,
    pub poster_url: Option<String>,
    /// Textless poster variant, when an enrichment source has one.
    pub clean_poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub logo_url: Option<String>,
    /// 0.0 when unknown or unparseable, never NaN.
    pub rating: f64,
    pub status: Option<ShowStatus>,
    pub related_shows: Vec<ShowEntry>,
    pub franchise_shows: Vec<ShowEntry>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Composite id: `"{showId}-{slug}/{episodeId}"`.
    pub id: String,
    pub number: u32,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Duration in seconds.
    pub duration: Option<u32>,
    pub filler: bool,
}

/// A playable URL plus the request headers required to dereference it.
/// Order across assets is significant: first is preferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub url: String,
    pub headers: HashMap<String, String>,
}

/// Curated, ordered list of shows. Built offline by the archive crawler
/// and served read-only from the static asset cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCollection {
    pub id: String,
    pub name: String,
    pub category: Option<FeedCategory>,
    pub shows: Vec<ShowEntry>,
}

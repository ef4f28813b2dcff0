use aniteca_core::ShowKind;
use url::Url;

use crate::{
    AnilistEpisode, AnilistShow, KitsuShow, MalEpisode, MalShow, PrimaryEpisode, PrimaryShow,
    PrimaryShowEntry, ProviderError,
};

/// Sort order accepted by the primary catalog's archive endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveSort {
    #[default]
    Score,
    Views,
    Popularity,
    LatestAired,
}

impl ArchiveSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Views => "views",
            Self::Popularity => "popularity",
            Self::LatestAired => "last_aired",
        }
    }
}

/// Server-side filter specification for an archive listing request.
#[derive(Debug, Clone, Default)]
pub struct ArchiveQuery {
    pub kind: Option<ShowKind>,
    pub genres: Vec<String>,
    pub year: Option<i32>,
    /// Distribution-service tag (e.g. `netflix`).
    pub service: Option<String>,
    pub minimum_views: Option<u64>,
    pub sort: ArchiveSort,
}

/// The primary catalog: owns the canonical show and episode identifiers.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PrimaryShowEntry>, ProviderError>;

    async fn show(&self, show_id: u32) -> Result<PrimaryShow, ProviderError>;

    /// One page of the flat episode index, `start` is 1-based.
    async fn episodes(
        &self,
        show_id: u32,
        start: u32,
        limit: u32,
    ) -> Result<Vec<PrimaryEpisode>, ProviderError>;

    /// Resolve a playable media id to its embedded-player page URL.
    async fn embed_url(&self, media_id: u64) -> Result<Url, ProviderError>;

    /// One page of the archive listing, `page` is 1-based.
    async fn archive_page(
        &self,
        page: u32,
        query: &ArchiveQuery,
    ) -> Result<Vec<PrimaryShowEntry>, ProviderError>;
}

/// MyAnimeList enrichment (via the Jikan REST API).
#[async_trait::async_trait]
pub trait MalSource: Send + Sync {
    async fn show(&self, mal_id: u32) -> Result<MalShow, ProviderError>;

    /// Episode titles and filler flags, paginated.
    async fn episodes(&self, mal_id: u32, page: u32) -> Result<Vec<MalEpisode>, ProviderError>;
}

/// AniList enrichment (GraphQL).
#[async_trait::async_trait]
pub trait AnilistSource: Send + Sync {
    async fn show(&self, anilist_id: u32) -> Result<AnilistShow, ProviderError>;

    async fn episodes(&self, anilist_id: u32) -> Result<Vec<AnilistEpisode>, ProviderError>;
}

/// Kitsu enrichment, keyed by MyAnimeList id through Kitsu's mapping index.
#[async_trait::async_trait]
pub trait KitsuSource: Send + Sync {
    async fn show_by_mal(&self, mal_id: u32) -> Result<KitsuShow, ProviderError>;
}

/// Raw HTML document fetch, used by the video-asset path.
#[async_trait::async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &Url, referer: Option<&str>) -> Result<String, ProviderError>;
}

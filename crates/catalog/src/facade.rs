//! The public catalog operations.
//!
//! Every operation is stateless and independent. Only the primary-provider
//! fetch is fatal; enrichment fetches are collected as `Result`s, logged on
//! failure, and degrade to missing fields.

use std::collections::HashMap;
use std::sync::Arc;

use aniteca_core::{CatalogError, MediaId, ShowId, ShowKind};
use aniteca_playlist::{PlaylistError, resolve_playlist_url};
use aniteca_providers::ProviderError;
use aniteca_providers::anilist::AnilistClient;
use aniteca_providers::animeunity::AnimeUnityClient;
use aniteca_providers::html::DocumentFetcher;
use aniteca_providers::jikan::JikanClient;
use aniteca_providers::kitsu::KitsuClient;
use aniteca_providers::source::{
    AnilistSource, CatalogSource, DocumentSource, KitsuSource, MalSource,
};
use tracing::warn;

use crate::assets::AssetStore;
use crate::map;
use crate::model::{Episode, FeedCollection, Show, ShowEntry, VideoAsset};
use crate::reconcile::{ArtworkPrecedence, first_non_empty, reconcile_rating};
use crate::seasons::{EPISODES_PER_SEASON, partition, season_start};

#[derive(Debug, Clone, Default)]
pub struct CatalogOptions {
    /// User-Agent propagated from the host into video asset headers.
    pub user_agent: Option<String>,
    pub artwork: ArtworkPrecedence,
}

impl CatalogOptions {
    pub fn from_env() -> Self {
        Self {
            user_agent: std::env::var("ANITECA_USER_AGENT").ok(),
            artwork: ArtworkPrecedence::default(),
        }
    }
}

pub struct Catalog {
    primary: Arc<dyn CatalogSource>,
    mal: Arc<dyn MalSource>,
    anilist: Arc<dyn AnilistSource>,
    kitsu: Arc<dyn KitsuSource>,
    documents: Arc<dyn DocumentSource>,
    assets: AssetStore,
    options: CatalogOptions,
}

impl Catalog {
    /// Catalog wired to the live upstream providers.
    pub fn new(options: CatalogOptions) -> Self {
        Self::with_sources(
            Arc::new(AnimeUnityClient::new()),
            Arc::new(JikanClient::new()),
            Arc::new(AnilistClient::new()),
            Arc::new(KitsuClient::new()),
            Arc::new(DocumentFetcher::new()),
            AssetStore::from_env(),
            options,
        )
    }

    pub fn with_sources(
        primary: Arc<dyn CatalogSource>,
        mal: Arc<dyn MalSource>,
        anilist: Arc<dyn AnilistSource>,
        kitsu: Arc<dyn KitsuSource>,
        documents: Arc<dyn DocumentSource>,
        assets: AssetStore,
        options: CatalogOptions,
    ) -> Self {
        Self {
            primary,
            mal,
            anilist,
            kitsu,
            documents,
            assets,
            options,
        }
    }

    pub async fn search_shows(&self, query: &str) -> Result<Vec<ShowEntry>, CatalogError> {
        let entries = self
            .primary
            .search(query)
            .await
            .map_err(|e| CatalogError::Upstream(e.to_string()))?;

        Ok(entries.into_iter().map(map::map_entry).collect())
    }

    pub async fn get_show(&self, id: &str) -> Result<Show, CatalogError> {
        let show_id: ShowId = id.parse()?;
        let primary = self
            .primary
            .show(show_id.id)
            .await
            .map_err(|e| fatal(e, id))?;

        // Enrichment fan-out, each call recovered independently.
        let mal = match primary.mal_id {
            Some(mal_id) => recover("myanimelist", self.mal.show(mal_id).await),
            None => None,
        };
        let anilist = match primary.anilist_id {
            Some(anilist_id) => recover("anilist", self.anilist.show(anilist_id).await),
            None => None,
        };
        let kitsu = match primary.mal_id {
            Some(mal_id) => recover("kitsu", self.kitsu.show_by_mal(mal_id).await),
            None => None,
        };

        let artwork = self.options.artwork;
        let poster_url = artwork.reconcile(
            primary.poster_url.clone(),
            [mal.as_ref().and_then(|m| m.poster_url.clone())],
        );
        let backdrop_url = artwork.reconcile(
            primary.cover_url.clone(),
            [
                kitsu.as_ref().and_then(|k| k.cover_url.clone()),
                anilist.as_ref().and_then(|a| a.banner_url.clone()),
            ],
        );
        let clean_poster_url = first_non_empty([anilist.as_ref().and_then(|a| a.cover_url.clone())]);
        let rating = reconcile_rating([mal.as_ref().and_then(|m| m.score), primary.score]);

        let seasons = match primary.kind {
            ShowKind::Series => Some(partition(primary.episodes_count, EPISODES_PER_SEASON)),
            ShowKind::Movie => None,
        };

        Ok(Show {
            id: show_id,
            kind: primary.kind,
            title: map::sanitize_title(&primary.title),
            overview: first_non_empty([primary.plot]),
            genres: primary.genres,
            duration: primary.episode_runtime.unwrap_or(0) * 60,
            release_date: map::release_date(primary.year, primary.cour.as_deref()),
            seasons,
            poster_url,
            clean_poster_url,
            backdrop_url,
            logo_url: None,
            rating,
            status: primary.status,
            related_shows: primary.suggested.into_iter().map(map::map_entry).collect(),
            franchise_shows: primary.related.into_iter().map(map::map_entry).collect(),
            language: Some(map::parse_language(&primary.title)),
        })
    }

    pub async fn get_episodes(&self, id: &str, season: u32) -> Result<Vec<Episode>, CatalogError> {
        let show_id: ShowId = id.parse()?;
        let primary = self
            .primary
            .show(show_id.id)
            .await
            .map_err(|e| fatal(e, id))?;

        let start = season_start(season, EPISODES_PER_SEASON);
        let rows = self
            .primary
            .episodes(show_id.id, start, EPISODES_PER_SEASON)
            .await
            .map_err(|e| fatal(e, id))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Titles and filler flags from MyAnimeList, thumbnails from AniList,
        // zipped by episode number. Absent numbers get defaults.
        let mut titles: HashMap<u32, String> = HashMap::new();
        let mut fillers: HashMap<u32, bool> = HashMap::new();
        let mut thumbnails: HashMap<u32, String> = HashMap::new();

        if let Some(mal_id) = primary.mal_id {
            let episodes = recover("myanimelist", self.mal.episodes(mal_id, season + 1).await);
            for ep in episodes.into_iter().flatten() {
                if let Some(title) = ep.title {
                    titles.insert(ep.number, title);
                }
                if let Some(filler) = ep.filler {
                    fillers.insert(ep.number, filler);
                }
            }
        }

        if let Some(anilist_id) = primary.anilist_id {
            let episodes = recover("anilist", self.anilist.episodes(anilist_id).await);
            for ep in episodes.into_iter().flatten() {
                if let Some(url) = ep.thumbnail_url {
                    thumbnails.insert(ep.number, url);
                }
            }
        }

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let number = map::episode_number(&row.number)?;
                Some(Episode {
                    id: format!("{show_id}/{}", row.id),
                    number,
                    title: titles.get(&number).cloned(),
                    overview: None,
                    thumbnail_url: thumbnails.get(&number).cloned(),
                    duration: primary.episode_runtime.map(|m| m * 60),
                    filler: fillers.get(&number).copied().unwrap_or(false),
                })
            })
            .collect())
    }

    pub async fn get_video_assets(&self, id: &str) -> Result<Vec<VideoAsset>, CatalogError> {
        let media: MediaId = id.parse()?;
        let media_id = match &media {
            MediaId::Episode(_, episode_id) => *episode_id,
            // A bare show id (movie): discover the playable media id by
            // fetching episode 1.
            MediaId::Show(show_id) => {
                let episodes = self
                    .primary
                    .episodes(show_id.id, 1, 1)
                    .await
                    .map_err(|e| fatal(e, id))?;
                episodes
                    .first()
                    .map(|e| e.id)
                    .ok_or_else(|| CatalogError::NotFound(format!("no playable media for {id}")))?
            }
        };

        let embed_url = self
            .primary
            .embed_url(media_id)
            .await
            .map_err(|e| fatal(e, id))?;

        let html = self
            .documents
            .fetch(&embed_url, None)
            .await
            .map_err(|e| fatal(e, id))?;

        let playlist = resolve_playlist_url(&embed_url, &html).map_err(|e| match e {
            PlaylistError::MalformedStreams(detail) => CatalogError::MalformedManifest(detail),
            PlaylistError::ManifestNotFound | PlaylistError::MissingStreamId => {
                CatalogError::ManifestNotFound
            }
        })?;

        let mut headers = HashMap::new();
        headers.insert("Referer".to_string(), embed_url.to_string());
        if let Some(user_agent) = &self.options.user_agent {
            headers.insert("User-Agent".to_string(), user_agent.clone());
        }

        Ok(vec![VideoAsset {
            url: playlist.to_string(),
            headers,
        }])
    }

    /// Precomputed curated collections, read-only at serve time.
    pub fn feed_collections(&self) -> Result<Vec<FeedCollection>, CatalogError> {
        self.assets
            .load_collections()
            .map_err(|e| CatalogError::Upstream(format!("asset cache: {e}")))
    }

    /// Precomputed trending shows, read-only at serve time.
    pub fn trending_shows(&self) -> Result<Vec<Show>, CatalogError> {
        self.assets
            .load_trending()
            .map_err(|e| CatalogError::Upstream(format!("asset cache: {e}")))
    }
}

/// Primary-source failures are fatal for the enclosing operation.
fn fatal(err: ProviderError, id: &str) -> CatalogError {
    match err {
        ProviderError::NotFound => CatalogError::NotFound(id.to_string()),
        other => CatalogError::Upstream(other.to_string()),
    }
}

/// Enrichment failures are swallowed here: logged, never raised.
fn recover<T>(source: &'static str, result: Result<T, ProviderError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(source, error = %err, "enrichment fetch failed, degrading");
            None
        }
    }
}

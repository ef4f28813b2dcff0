//! AnimeUnity catalog client — the primary provider.

use aniteca_core::{ShowKind, ShowStatus};
use tracing::debug;
use url::Url;

use crate::source::{ArchiveQuery, CatalogSource};
use crate::{PrimaryEpisode, PrimaryShow, PrimaryShowEntry, ProviderError};

const DEFAULT_BASE_URL: &str = "https://www.animeunity.so";

/// Page size of the archive listing endpoint.
pub const ARCHIVE_PAGE_SIZE: u32 = 30;

pub struct AnimeUnityClient {
    base_url: String,
    client: reqwest::Client,
}

impl AnimeUnityClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, ProviderError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "animeunity request");

        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(ProviderError::Provider(format!(
                "animeunity returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| ProviderError::Provider(format!("parse JSON: {e}")))
    }
}

impl Default for AnimeUnityClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CatalogSource for AnimeUnityClient {
    async fn search(&self, query: &str) -> Result<Vec<PrimaryShowEntry>, ProviderError> {
        let url = format!("{}/livesearch", self.base_url);
        debug!(url = %url, query, "animeunity search");

        let resp = self
            .client
            .post(&url)
            .form(&[("title", query)])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Provider(format!(
                "animeunity returned {}",
                resp.status()
            )));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Provider(format!("parse JSON: {e}")))?;

        Ok(parse_entries(&data["records"]))
    }

    async fn show(&self, show_id: u32) -> Result<PrimaryShow, ProviderError> {
        let data = self.get_json(&format!("/info_api/{show_id}/"), &[]).await?;
        parse_show(&data).ok_or(ProviderError::NotFound)
    }

    async fn episodes(
        &self,
        show_id: u32,
        start: u32,
        limit: u32,
    ) -> Result<Vec<PrimaryEpisode>, ProviderError> {
        let end = start + limit.saturating_sub(1);
        let data = self
            .get_json(
                &format!("/info_api/{show_id}/1"),
                &[
                    ("start_range", start.to_string()),
                    ("end_range", end.to_string()),
                ],
            )
            .await?;

        Ok(parse_episodes(&data["episodes"]))
    }

    async fn embed_url(&self, media_id: u64) -> Result<Url, ProviderError> {
        let url = format!("{}/embed-url/{media_id}", self.base_url);
        debug!(url = %url, "animeunity embed url");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(ProviderError::Provider(format!(
                "animeunity returned {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Url::parse(body.trim())
            .map_err(|e| ProviderError::Provider(format!("bad embed url: {e}")))
    }

    async fn archive_page(
        &self,
        page: u32,
        query: &ArchiveQuery,
    ) -> Result<Vec<PrimaryShowEntry>, ProviderError> {
        let offset = page.saturating_sub(1) * ARCHIVE_PAGE_SIZE;
        let mut params = vec![
            ("offset", offset.to_string()),
            ("order", query.sort.as_str().to_string()),
        ];
        if let Some(kind) = query.kind {
            let value = match kind {
                ShowKind::Movie => "Movie",
                ShowKind::Series => "TV",
            };
            params.push(("type", value.to_string()));
        }
        if !query.genres.is_empty() {
            params.push(("genres", query.genres.join(",")));
        }
        if let Some(year) = query.year {
            params.push(("year", year.to_string()));
        }
        if let Some(service) = &query.service {
            params.push(("service", service.clone()));
        }
        if let Some(views) = query.minimum_views {
            params.push(("min_views", views.to_string()));
        }

        let data = self.get_json("/archivio/get-animes", &params).await?;
        Ok(parse_entries(&data["records"]))
    }
}

fn parse_entries(records: &serde_json::Value) -> Vec<PrimaryShowEntry> {
    records
        .as_array()
        .map(|rs| rs.iter().filter_map(parse_entry).collect())
        .unwrap_or_default()
}

fn parse_entry(record: &serde_json::Value) -> Option<PrimaryShowEntry> {
    Some(PrimaryShowEntry {
        id: record["id"].as_u64()? as u32,
        slug: record["slug"].as_str().unwrap_or_default().to_string(),
        title: record["title_eng"].as_str()?.to_string(),
        kind: parse_kind(record["type"].as_str()),
        poster_url: record["imageurl"].as_str().map(|s| s.to_string()),
        year: record["date"].as_str().and_then(|d| d.get(..4)).and_then(|y| y.parse().ok()),
        dubbed: record["dub"].as_i64() == Some(1),
    })
}

fn parse_show(record: &serde_json::Value) -> Option<PrimaryShow> {
    Some(PrimaryShow {
        id: record["id"].as_u64()? as u32,
        slug: record["slug"].as_str().unwrap_or_default().to_string(),
        title: record["title_eng"].as_str()?.to_string(),
        kind: parse_kind(record["type"].as_str()),
        poster_url: record["imageurl"].as_str().map(|s| s.to_string()),
        cover_url: record["imageurl_cover"].as_str().map(|s| s.to_string()),
        plot: record["plot"].as_str().map(|s| s.to_string()),
        score: parse_score(&record["score"]),
        genres: record["genres"]
            .as_array()
            .map(|gs| {
                gs.iter()
                    .filter_map(|g| g["name"].as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default(),
        episodes_count: record["episodes_count"].as_u64().unwrap_or(0) as u32,
        episode_runtime: record["episodes_length"].as_u64().map(|l| l as u32),
        year: record["date"].as_str().and_then(|d| d.get(..4)).and_then(|y| y.parse().ok()),
        cour: record["season"].as_str().map(|s| s.to_string()),
        status: record["status"].as_str().and_then(parse_status),
        mal_id: record["mal_id"].as_u64().map(|v| v as u32),
        anilist_id: record["anilist_id"].as_u64().map(|v| v as u32),
        suggested: parse_entries(&record["suggested"]),
        related: parse_entries(&record["related"]),
    })
}

fn parse_episodes(episodes: &serde_json::Value) -> Vec<PrimaryEpisode> {
    episodes
        .as_array()
        .map(|eps| {
            eps.iter()
                .filter_map(|ep| {
                    Some(PrimaryEpisode {
                        id: parse_episode_id(&ep["id"])?,
                        number: episode_number_string(&ep["number"])?,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

// Episode ids arrive as numbers or numeric strings depending on the endpoint.
fn parse_episode_id(value: &serde_json::Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn episode_number_string(value: &serde_json::Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    value.as_u64().map(|n| n.to_string())
}

fn parse_kind(kind: Option<&str>) -> ShowKind {
    match kind {
        Some("Movie") => ShowKind::Movie,
        _ => ShowKind::Series,
    }
}

/// Scores arrive as numbers or numeric strings; anything unparseable or
/// non-finite is treated as absent.
fn parse_score(value: &serde_json::Value) -> Option<f64> {
    let score = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))?;
    score.is_finite().then_some(score)
}

fn parse_status(raw: &str) -> Option<ShowStatus> {
    match raw.to_lowercase().as_str() {
        "in corso" => Some(ShowStatus::Airing),
        "terminato" => Some(ShowStatus::Ended),
        "in uscita" => Some(ShowStatus::Upcoming),
        "droppato" => Some(ShowStatus::Canceled),
        _ => None,
    }
}

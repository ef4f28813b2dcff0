//! Offline feed-cache generator.
//!
//! Crawls the primary catalog's archive into named collections plus a small
//! trending list, and writes them as static JSON assets for the serving
//! path. A failed collection aborts only that collection; the batch
//! continues with the next one.

mod collections;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use aniteca_catalog::archive::{CrawlRequest, Crawler, DEFAULT_DELAY_MS, polite_delay};
use aniteca_catalog::assets::AssetStore;
use aniteca_catalog::map;
use aniteca_catalog::model::Show;
use aniteca_catalog::{Catalog, CatalogOptions};
use aniteca_providers::animeunity::AnimeUnityClient;
use aniteca_providers::source::{ArchiveQuery, ArchiveSort};

use collections::{build_collection, collection_configs};

const TRENDING_COUNT: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let assets = AssetStore::from_env();
    let primary = AnimeUnityClient::new();
    let crawler = Crawler::new(&primary);

    let mut feed = Vec::new();
    for config in collection_configs() {
        match build_collection(&crawler, &config).await {
            Ok(collection) => {
                info!(
                    name = config.name,
                    shows = collection.shows.len(),
                    "collection built"
                );
                feed.push(collection);
            }
            Err(err) => {
                error!(name = config.name, error = %err, "collection build failed, skipping");
            }
        }
        polite_delay(DEFAULT_DELAY_MS).await;
    }

    assets
        .save_collections(&feed)
        .context("failed to write feed collections")?;
    info!(collections = feed.len(), "feed collections written");

    let trending = build_trending(&crawler).await;
    assets
        .save_trending(&trending)
        .context("failed to write trending shows")?;
    info!(shows = trending.len(), "trending shows written");

    Ok(())
}

/// Full detail records for the currently most popular shows.
async fn build_trending(crawler: &Crawler<'_, AnimeUnityClient>) -> Vec<Show> {
    let request = CrawlRequest {
        query: ArchiveQuery {
            sort: ArchiveSort::Popularity,
            ..Default::default()
        },
        dub: None,
        max_pages: Some(1),
        max_items: Some(TRENDING_COUNT),
    };

    let entries = match crawler.crawl(&request).await {
        Ok(entries) => entries,
        Err(err) => {
            error!(error = %err, "trending crawl failed");
            return Vec::new();
        }
    };

    let catalog = Catalog::new(CatalogOptions::from_env());
    let mut trending = Vec::new();
    for entry in entries {
        let id = map::map_entry(entry).id.to_string();
        polite_delay(DEFAULT_DELAY_MS).await;
        match catalog.get_show(&id).await {
            Ok(show) => trending.push(show),
            Err(err) => error!(id, error = %err, "trending show fetch failed, skipping"),
        }
    }
    trending
}

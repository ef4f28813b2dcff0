//! Named collection configurations for the offline feed cache.

use aniteca_catalog::archive::{CrawlRequest, Crawler};
use aniteca_catalog::map;
use aniteca_catalog::model::FeedCollection;
use aniteca_core::{FeedCategory, ShowKind};
use aniteca_providers::ProviderError;
use aniteca_providers::source::{ArchiveQuery, ArchiveSort, CatalogSource};

pub struct CollectionConfig {
    pub name: &'static str,
    pub query: ArchiveQuery,
    /// Dub/sub split applied client-side.
    pub dub: bool,
    pub category: Option<FeedCategory>,
    pub max_pages: Option<u32>,
}

pub fn collection_configs() -> Vec<CollectionConfig> {
    vec![
        CollectionConfig {
            name: "Gli anime più visti",
            query: ArchiveQuery {
                sort: ArchiveSort::Views,
                ..Default::default()
            },
            dub: false,
            category: None,
            max_pages: None,
        },
        CollectionConfig {
            name: "Gli anime doppiati più visti",
            query: ArchiveQuery {
                sort: ArchiveSort::Views,
                ..Default::default()
            },
            dub: true,
            category: None,
            max_pages: None,
        },
        CollectionConfig {
            name: "Anime del momento",
            query: ArchiveQuery {
                sort: ArchiveSort::Popularity,
                ..Default::default()
            },
            dub: false,
            category: Some(FeedCategory::Hot),
            max_pages: None,
        },
        CollectionConfig {
            name: "I film anime più apprezzati",
            query: ArchiveQuery {
                kind: Some(ShowKind::Movie),
                ..Default::default()
            },
            dub: false,
            category: None,
            max_pages: None,
        },
        CollectionConfig {
            name: "I film anime doppiati più apprezzati",
            query: ArchiveQuery {
                kind: Some(ShowKind::Movie),
                ..Default::default()
            },
            dub: true,
            category: None,
            max_pages: None,
        },
        CollectionConfig {
            name: "Le serie anime più amate",
            query: ArchiveQuery {
                kind: Some(ShowKind::Series),
                ..Default::default()
            },
            dub: false,
            category: None,
            max_pages: None,
        },
        CollectionConfig {
            name: "Le serie anime doppiate più amate",
            query: ArchiveQuery {
                kind: Some(ShowKind::Series),
                ..Default::default()
            },
            dub: true,
            category: None,
            max_pages: None,
        },
    ]
}

pub async fn build_collection<S: CatalogSource + ?Sized>(
    crawler: &Crawler<'_, S>,
    config: &CollectionConfig,
) -> Result<FeedCollection, ProviderError> {
    let entries = crawler
        .crawl(&CrawlRequest {
            query: config.query.clone(),
            dub: Some(config.dub),
            max_pages: config.max_pages,
            max_items: None,
        })
        .await?;

    Ok(FeedCollection {
        id: collection_id(config.name),
        name: config.name.to_string(),
        category: config.category,
        shows: entries.into_iter().map(map::map_entry).collect(),
    })
}

pub fn collection_id(name: &str) -> String {
    format!("au-{}", name.to_lowercase().replace(' ', "-"))
}

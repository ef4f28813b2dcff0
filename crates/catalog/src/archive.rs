//! Bounded, rate-limited crawling of the primary catalog's archive listing.
//!
//! Pages are requested strictly in sequence: the randomized inter-request
//! delay is part of the crawler's contract with the upstream site, so pages
//! must never be fetched concurrently.

use std::ops::RangeInclusive;
use std::time::Duration;

use aniteca_providers::source::{ArchiveQuery, CatalogSource};
use aniteca_providers::{PrimaryShowEntry, ProviderError};
use rand::Rng;
use tracing::debug;

pub const DEFAULT_MAX_PAGES: u32 = 2;

/// Vendor-site-friendly delay bounds in milliseconds.
pub const DEFAULT_DELAY_MS: RangeInclusive<u64> = 2000..=3000;

/// One archive crawl: the server-side filter plus the client-side bounds
/// and the dub/sub split the server cannot express.
#[derive(Debug, Clone, Default)]
pub struct CrawlRequest {
    pub query: ArchiveQuery,
    /// `Some(true)` keeps dubbed entries only, `Some(false)` subbed only.
    pub dub: Option<bool>,
    /// Page budget; defaults to [`DEFAULT_MAX_PAGES`].
    pub max_pages: Option<u32>,
    /// Truncate the accumulated list, preserving server order.
    pub max_items: Option<usize>,
}

pub struct Crawler<'a, S: CatalogSource + ?Sized> {
    source: &'a S,
    delay_ms: RangeInclusive<u64>,
}

impl<'a, S: CatalogSource + ?Sized> Crawler<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }

    /// Override the politeness delay bounds. Tests use `0..=0`.
    pub fn with_delay_ms(mut self, delay_ms: RangeInclusive<u64>) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Materialize a bounded, ordered list of entries.
    ///
    /// A page returning zero results ends pagination early. Any failed page
    /// aborts the whole crawl: no partial collection is silently returned.
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<Vec<PrimaryShowEntry>, ProviderError> {
        let max_pages = request.max_pages.unwrap_or(DEFAULT_MAX_PAGES).max(1);
        let mut entries = Vec::new();

        for page in 1..=max_pages {
            if page > 1 {
                polite_delay(self.delay_ms.clone()).await;
            }

            let batch = self.source.archive_page(page, &request.query).await?;
            debug!(page, count = batch.len(), "archive page fetched");
            if batch.is_empty() {
                break;
            }
            entries.extend(batch);
        }

        if let Some(dub) = request.dub {
            entries.retain(|e| e.dubbed == dub);
        }
        if let Some(max) = request.max_items {
            entries.truncate(max);
        }

        Ok(entries)
    }
}

/// Sleep for a uniformly random duration within `bounds` (milliseconds).
pub async fn polite_delay(bounds: RangeInclusive<u64>) {
    let ms = rand::thread_rng().gen_range(bounds);
    if ms > 0 {
        debug!(ms, "waiting between archive requests");
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use aniteca_core::ShowKind;
    use aniteca_providers::source::ArchiveQuery;
    use aniteca_providers::{PrimaryEpisode, PrimaryShow};
    use url::Url;

    use super::*;

    /// Archive source yielding `pages` full pages, empty afterwards. The
    /// non-archive operations are never exercised by the crawler.
    struct FakeArchive {
        pages: u32,
        fail_on_page: Option<u32>,
        calls: AtomicU32,
    }

    impl FakeArchive {
        fn with_pages(pages: u32) -> Self {
            Self {
                pages,
                fail_on_page: None,
                calls: AtomicU32::new(0),
            }
        }

        fn entry(id: u32, dubbed: bool) -> PrimaryShowEntry {
            PrimaryShowEntry {
                id,
                slug: format!("show-{id}"),
                title: format!("Show {id}"),
                kind: ShowKind::Series,
                poster_url: None,
                year: Some(2020),
                dubbed,
            }
        }
    }

    #[async_trait::async_trait]
    impl CatalogSource for FakeArchive {
        async fn search(&self, _query: &str) -> Result<Vec<PrimaryShowEntry>, ProviderError> {
            unimplemented!("not used by the crawler")
        }

        async fn show(&self, _show_id: u32) -> Result<PrimaryShow, ProviderError> {
            unimplemented!("not used by the crawler")
        }

        async fn episodes(
            &self,
            _show_id: u32,
            _start: u32,
            _limit: u32,
        ) -> Result<Vec<PrimaryEpisode>, ProviderError> {
            unimplemented!("not used by the crawler")
        }

        async fn embed_url(&self, _media_id: u64) -> Result<Url, ProviderError> {
            unimplemented!("not used by the crawler")
        }

        async fn archive_page(
            &self,
            page: u32,
            _query: &ArchiveQuery,
        ) -> Result<Vec<PrimaryShowEntry>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_page == Some(page) {
                return Err(ProviderError::Network("boom".into()));
            }
            if page > self.pages {
                return Ok(Vec::new());
            }
            let base = (page - 1) * 3;
            Ok(vec![
                Self::entry(base + 1, false),
                Self::entry(base + 2, true),
                Self::entry(base + 3, false),
            ])
        }
    }

    fn crawler(source: &FakeArchive) -> Crawler<'_, FakeArchive> {
        Crawler::new(source).with_delay_ms(0..=0)
    }

    #[tokio::test]
    async fn respects_page_budget() {
        let source = FakeArchive::with_pages(10);
        let entries = crawler(&source)
            .crawl(&CrawlRequest {
                max_pages: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(entries.len(), 6);
        // Server-assigned order is preserved across pages.
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[5].id, 6);
    }

    #[tokio::test]
    async fn stops_immediately_on_empty_first_page() {
        let source = FakeArchive::with_pages(0);
        let entries = crawler(&source)
            .crawl(&CrawlRequest {
                max_pages: Some(5),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(entries.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn default_budget_is_two_pages() {
        let source = FakeArchive::with_pages(10);
        crawler(&source)
            .crawl(&CrawlRequest::default())
            .await
            .unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dub_split_is_applied_client_side() {
        let source = FakeArchive::with_pages(1);

        let dubbed = crawler(&source)
            .crawl(&CrawlRequest {
                dub: Some(true),
                max_pages: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(dubbed.len(), 1);
        assert!(dubbed.iter().all(|e| e.dubbed));
    }

    #[tokio::test]
    async fn truncates_to_max_items() {
        let source = FakeArchive::with_pages(2);
        let entries = crawler(&source)
            .crawl(&CrawlRequest {
                max_items: Some(4),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3].id, 4);
    }

    #[tokio::test]
    async fn failed_page_aborts_the_crawl() {
        let mut source = FakeArchive::with_pages(3);
        source.fail_on_page = Some(2);

        let err = crawler(&source)
            .crawl(&CrawlRequest {
                max_pages: Some(3),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Network(_)));
    }
}

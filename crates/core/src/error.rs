use thiserror::Error;

/// Unified error type surfaced by the catalog operations.
///
/// Enrichment-source failures never appear here: they are recovered where
/// the fetch happens and only degrade individual fields. Primary-source and
/// manifest-extraction failures are fatal for the enclosing operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("playlist manifest not found")]
    ManifestNotFound,

    #[error("malformed playlist manifest: {0}")]
    MalformedManifest(String),
}

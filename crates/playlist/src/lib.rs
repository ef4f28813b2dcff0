//! Playlist-manifest extraction from an embedded player page.
//!
//! The player bootstraps itself from inline script state (a `params` object
//! literal and a `window.streams` array). This crate decodes that state back
//! into a signed playlist URL. It is a best-effort decoder over an
//! undocumented format, not a JS parser; the fallback paths are part of the
//! contract.

pub mod extract;

use thiserror::Error;

pub use extract::resolve_playlist_url;

#[derive(Debug, Error)]
pub enum PlaylistError {
    /// No `params` block in any inline script. Nothing can be built.
    #[error("playlist params not found in embedded script")]
    ManifestNotFound,

    /// The source URL has no trailing path segment to use as a stream id.
    #[error("missing stream id in source url")]
    MissingStreamId,

    /// `window.streams` was present but not valid JSON. Recovered internally
    /// by falling back to the default playlist URL.
    #[error("malformed streams data: {0}")]
    MalformedStreams(String),
}

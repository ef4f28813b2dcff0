use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::PlaylistError;

// Inline script bodies, in document order.
static RE_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script[^>]*>(.*?)</script>").unwrap());

// `params : { 'token': 'abc', ... }` — a flat single-quoted map, one level deep.
static RE_PARAMS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"params\s*:\s*\{([^}]*)\}").unwrap());

static RE_PARAM_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(\w+)'\s*:\s*'([^']+)'").unwrap());

// `window.streams = [ ... ]` — a JSON array of stream descriptors.
static RE_STREAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window\.streams\s*=\s*(\[[^\]]+\])").unwrap());

static RE_CAN_PLAY_FHD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window\.canPlayFHD\s*=\s*true").unwrap());

#[derive(Debug, Deserialize)]
struct Stream {
    #[serde(default)]
    active: bool,
    url: String,
}

/// Concatenate all inline `<script>` bodies of a document.
fn inline_scripts(html: &str) -> String {
    RE_SCRIPT
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}

/// Decode the playlist URL embedded in a player page.
///
/// `source` is the URL the page was fetched from; its trailing path segment
/// doubles as the stream id for the fallback base URL, and its query may
/// carry the low-bandwidth (`b=1`) and FHD (`canPlayFHD`) hints.
pub fn resolve_playlist_url(source: &Url, html: &str) -> Result<Url, PlaylistError> {
    let id = source
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or(PlaylistError::MissingStreamId)?;

    let scripts = inline_scripts(html);

    let params_block = RE_PARAMS_BLOCK
        .captures(&scripts)
        .map(|c| c[1].to_string())
        .ok_or(PlaylistError::ManifestNotFound)?;

    let mut playlist = playlist_base_url(source, &id, &scripts);

    // Signed query parameters, in source order.
    for pair in RE_PARAM_PAIR.captures_iter(&params_block) {
        playlist.query_pairs_mut().append_pair(&pair[1], &pair[2]);
    }

    if source.query_pairs().any(|(k, v)| k == "b" && v == "1") {
        playlist.query_pairs_mut().append_pair("b", "1");
    }

    let can_play_fhd = source.query_pairs().any(|(k, _)| k == "canPlayFHD")
        || RE_CAN_PLAY_FHD.is_match(&scripts);
    if can_play_fhd {
        playlist.query_pairs_mut().append_pair("h", "1");
    }

    Ok(playlist)
}

/// Pick the active stream URL from `window.streams`, or fall back to
/// `https://<host>/playlist/<id>` when the array is absent, has no active
/// element, or fails to parse.
fn playlist_base_url(source: &Url, id: &str, scripts: &str) -> Url {
    match find_active_stream(scripts) {
        Ok(Some(active)) => {
            if let Ok(url) = Url::parse(&active) {
                return url;
            }
            warn!(url = %active, "active stream url is not absolute, using default");
        }
        Ok(None) => {}
        Err(err) => {
            warn!(error = %err, "failed to decode streams data, using default playlist url");
        }
    }

    let mut base = source.clone();
    base.set_path(&format!("/playlist/{id}"));
    base.set_query(None);
    base.set_fragment(None);
    base
}

fn find_active_stream(scripts: &str) -> Result<Option<String>, PlaylistError> {
    let Some(captures) = RE_STREAMS.captures(scripts) else {
        return Ok(None);
    };

    let streams: Vec<Stream> = serde_json::from_str(&captures[1])
        .map_err(|e| PlaylistError::MalformedStreams(e.to_string()))?;

    Ok(streams.into_iter().find(|s| s.active).map(|s| s.url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(script: &str) -> String {
        format!("<html><head><script>{script}</script></head><body></body></html>")
    }

    const PARAMS: &str = "window.masterPlaylist = { params : { 'token': 'abc123', 'expires': '1700000000' } }";

    #[test]
    fn picks_active_stream_as_base() {
        let html = page(&format!(
            "window.streams = [{{\"active\":false,\"url\":\"https://a.example/playlist/1\"}},\
             {{\"active\":true,\"url\":\"https://b.example/playlist/2\"}}];\n{PARAMS}"
        ));
        let source = Url::parse("https://vixcloud.co/embed/271977").unwrap();

        let url = resolve_playlist_url(&source, &html).unwrap();
        assert_eq!(url.host_str(), Some("b.example"));
        assert_eq!(url.path(), "/playlist/2");
    }

    #[test]
    fn falls_back_to_default_base_without_streams() {
        let html = page(PARAMS);
        let source = Url::parse("https://vixcloud.co/embed/271977").unwrap();

        let url = resolve_playlist_url(&source, &html).unwrap();
        assert_eq!(url.host_str(), Some("vixcloud.co"));
        assert_eq!(url.path(), "/playlist/271977");
        assert_eq!(
            url.query(),
            Some("token=abc123&expires=1700000000")
        );
    }

    #[test]
    fn falls_back_when_streams_json_is_malformed() {
        let html = page(&format!(
            "window.streams = [{{active: true, url: missing_quotes}}];\n{PARAMS}"
        ));
        let source = Url::parse("https://vixcloud.co/embed/271977").unwrap();

        let url = resolve_playlist_url(&source, &html).unwrap();
        assert_eq!(url.path(), "/playlist/271977");
    }

    #[test]
    fn falls_back_when_no_stream_is_active() {
        let html = page(&format!(
            "window.streams = [{{\"active\":false,\"url\":\"https://a.example/x\"}}];\n{PARAMS}"
        ));
        let source = Url::parse("https://vixcloud.co/embed/271977").unwrap();

        let url = resolve_playlist_url(&source, &html).unwrap();
        assert_eq!(url.path(), "/playlist/271977");
    }

    #[test]
    fn missing_params_is_fatal() {
        let html = page("window.streams = [{\"active\":true,\"url\":\"https://a.example/x\"}];");
        let source = Url::parse("https://vixcloud.co/embed/271977").unwrap();

        let err = resolve_playlist_url(&source, &html).unwrap_err();
        assert!(matches!(err, PlaylistError::ManifestNotFound));
    }

    #[test]
    fn appends_low_bandwidth_flag_from_source_query() {
        let html = page(PARAMS);
        let source = Url::parse("https://vixcloud.co/embed/271977?b=1").unwrap();

        let url = resolve_playlist_url(&source, &html).unwrap();
        assert!(url.query().unwrap().ends_with("b=1"));
    }

    #[test]
    fn appends_fhd_flag_from_script_marker() {
        let html = page(&format!("{PARAMS};\nwindow.canPlayFHD = true;"));
        let source = Url::parse("https://vixcloud.co/embed/271977").unwrap();

        let url = resolve_playlist_url(&source, &html).unwrap();
        assert!(url.query().unwrap().ends_with("h=1"));
    }

    #[test]
    fn appends_fhd_flag_from_source_query() {
        let html = page(PARAMS);
        let source = Url::parse("https://vixcloud.co/embed/271977?canPlayFHD=1").unwrap();

        let url = resolve_playlist_url(&source, &html).unwrap();
        assert!(url.query().unwrap().ends_with("h=1"));
    }

    #[test]
    fn concatenates_multiple_inline_scripts() {
        let html = format!(
            "<script>window.streams = [{{\"active\":true,\"url\":\"https://b.example/playlist/2\"}}];</script>\
             <script type=\"text/javascript\">{PARAMS}</script>"
        );
        let source = Url::parse("https://vixcloud.co/embed/271977").unwrap();

        let url = resolve_playlist_url(&source, &html).unwrap();
        assert_eq!(url.host_str(), Some("b.example"));
    }
}

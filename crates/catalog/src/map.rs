//! Primary-record to catalog-model mapping helpers.

use std::sync::LazyLock;

use aniteca_core::ShowId;
use aniteca_providers::PrimaryShowEntry;
use chrono::NaiveDate;
use regex::Regex;

use crate::model::ShowEntry;

static RE_DUB_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\(ITA\)\s*").unwrap());

pub fn map_entry(entry: PrimaryShowEntry) -> ShowEntry {
    let language = parse_language(&entry.title);
    ShowEntry {
        kind: entry.kind,
        id: ShowId::new(entry.id, entry.slug),
        title: sanitize_title(&entry.title),
        poster_url: entry.poster_url,
        year: entry.year,
        language: Some(language),
    }
}

/// Strip the `(ITA)` dub marker from a title.
pub fn sanitize_title(title: &str) -> String {
    RE_DUB_MARKER.replace_all(title, " ").trim().to_string()
}

/// ISO 639-1 audio language, inferred from the dub marker in the title.
pub fn parse_language(title: &str) -> String {
    if title.to_uppercase().contains("(ITA)") {
        "it".to_string()
    } else {
        "ja".to_string()
    }
}

/// Synthesize a `yyyy-mm-dd` release date from a year and a broadcast cour.
pub fn release_date(year: Option<i32>, cour: Option<&str>) -> Option<String> {
    let year = year?;
    let month = match cour {
        Some("Inverno") => 1,
        Some("Primavera") => 4,
        Some("Estate") => 7,
        Some("Autunno") => 10,
        _ => 1,
    };
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Episode numbers occasionally arrive as ranges (`"135-136"`); the first
/// number keys the episode.
pub fn episode_number(raw: &str) -> Option<u32> {
    let head = raw.split('-').next().unwrap_or(raw);
    head.trim().parse().ok()
}

//! Field-level reconciliation.
//!
//! Merge rules:
//! 1. Candidates are tried in precedence order; the first non-empty wins.
//! 2. Blank and whitespace-only strings count as empty.
//! 3. The rule applies per field, not per source: one enrichment source may
//!    win the poster while another wins the rating.
//!
//! Enrichment fetch failures never reach this module; a failed source
//! contributes `None` for all of its candidates.

/// First candidate that is present and not blank.
pub fn first_non_empty<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

/// First finite, positive rating candidate; 0.0 when none qualifies.
pub fn reconcile_rating<I>(candidates: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(0.0)
}

/// Precedence between primary-provider artwork and enrichment artwork.
///
/// The two observed catalog pipelines disagree here, so the policy is
/// explicit instead of hard-coded. `EnrichmentFirst` matches the anime
/// pipeline: richer image providers beat the primary site's artwork
/// whenever they have any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtworkPrecedence {
    #[default]
    EnrichmentFirst,
    PrimaryFirst,
}

impl ArtworkPrecedence {
    /// Reconcile one artwork field under this policy. `enrichment` is in
    /// priority order among the enrichment sources themselves.
    pub fn reconcile<I>(self, primary: Option<String>, enrichment: I) -> Option<String>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        match self {
            Self::EnrichmentFirst => {
                first_non_empty(enrichment.into_iter().chain(std::iter::once(primary)))
            }
            Self::PrimaryFirst => {
                first_non_empty(std::iter::once(primary).chain(enrichment))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_empty_skips_blank_candidates() {
        let got = first_non_empty([
            None,
            Some("   ".to_string()),
            Some("".to_string()),
            Some("https://x/img.jpg".to_string()),
            Some("https://y/img.jpg".to_string()),
        ]);
        assert_eq!(got.as_deref(), Some("https://x/img.jpg"));
    }

    #[test]
    fn all_empty_yields_default() {
        assert_eq!(first_non_empty([None, Some(" ".to_string()), None]), None);
        assert_eq!(reconcile_rating([None, None]), 0.0);
    }

    #[test]
    fn rating_skips_zero_and_non_finite() {
        assert_eq!(reconcile_rating([Some(0.0), Some(f64::NAN), Some(8.4)]), 8.4);
        assert_eq!(reconcile_rating([Some(f64::INFINITY), None]), 0.0);
    }

    #[test]
    fn enrichment_first_prefers_enrichment_artwork() {
        let got = ArtworkPrecedence::EnrichmentFirst.reconcile(
            Some("primary.jpg".to_string()),
            [None, Some("enrich.jpg".to_string())],
        );
        assert_eq!(got.as_deref(), Some("enrich.jpg"));
    }

    #[test]
    fn primary_first_only_falls_back_when_primary_is_empty() {
        let policy = ArtworkPrecedence::PrimaryFirst;

        let kept = policy.reconcile(
            Some("primary.jpg".to_string()),
            [Some("enrich.jpg".to_string())],
        );
        assert_eq!(kept.as_deref(), Some("primary.jpg"));

        let fallback = policy.reconcile(None, [Some("enrich.jpg".to_string())]);
        assert_eq!(fallback.as_deref(), Some("enrich.jpg"));
    }
}

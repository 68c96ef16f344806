//! Candidate matching between a value-key and the feature catalog.
//!
//! Compatibility keys are inconsistently granular: some features are keyed
//! at property level, some at value level. The search therefore widens in
//! tiers (exact key, property prefix, property substring) and scores the
//! surviving candidates by how textually aligned they are with the value.

use tracing::debug;

use crate::bcd;
use crate::catalog::FeatureEntry;

/// The winning candidate: the entry, the specific compatibility key that
/// matched, and its score.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub entry: &'a FeatureEntry,
    pub key: &'a str,
    pub score: i32,
}

/// Find the best catalog entry for `(property, value)`.
///
/// Absence of a match is a normal outcome, not an error. Given a fixed
/// catalog order the result is deterministic: ties keep the candidate
/// encountered first.
pub fn best_match<'a>(
    features: &'a [FeatureEntry],
    property: &str,
    value: &str,
) -> Option<Match<'a>> {
    let property_key = bcd::property_key(property);
    let value_key = bcd::value_key(property, value);
    let candidates = collect_candidates(features, &property_key, &value_key);
    if candidates.is_empty() {
        return None;
    }

    let token = bcd::normalize_token(value);
    let mut best: Option<Match<'a>> = None;
    for (entry, key) in candidates {
        let score = score_key(key, &token);
        if best.map_or(true, |b| score > b.score) {
            best = Some(Match { entry, key, score });
        }
    }

    if let Some(m) = best {
        debug!(key = m.key, score = m.score, feature = %m.entry.id, "Best catalog candidate");
    }
    best
}

/// Entry whose compatibility keys contain the property key verbatim, for
/// the value-agnostic fallback.
pub fn property_level<'a>(
    features: &'a [FeatureEntry],
    property_key: &str,
) -> Option<&'a FeatureEntry> {
    features
        .iter()
        .find(|f| f.compat_keys.iter().any(|k| k == property_key))
}

/// Tiered collection: exact value-key matches first; failing that, keys
/// under `<property_key>.`; failing that, keys merely containing the
/// property key anywhere.
fn collect_candidates<'a>(
    features: &'a [FeatureEntry],
    property_key: &str,
    value_key: &str,
) -> Vec<(&'a FeatureEntry, &'a str)> {
    let exact = keys_where(features, |k| k == value_key);
    if !exact.is_empty() {
        return exact;
    }

    let prefix = format!("{}.", property_key);
    let prefixed = keys_where(features, |k| k.starts_with(&prefix));
    if !prefixed.is_empty() {
        return prefixed;
    }

    keys_where(features, |k| k.contains(property_key))
}

fn keys_where<'a>(
    features: &'a [FeatureEntry],
    predicate: impl Fn(&str) -> bool,
) -> Vec<(&'a FeatureEntry, &'a str)> {
    let mut out = Vec::new();
    for entry in features {
        for key in &entry.compat_keys {
            if predicate(key) {
                out.push((entry, key.as_str()));
            }
        }
    }
    out
}

/// Score one candidate key against the normalized value token:
/// +10 for a `.{token}` suffix, +5 for the token anywhere, plus a
/// specificity bonus of `max(0, 5 - segments)` favoring shorter keys.
fn score_key(key: &str, token: &str) -> i32 {
    let key = key.to_lowercase();
    let mut score = 0;

    if !token.is_empty() {
        if key.ends_with(&format!(".{}", token)) {
            score += 10;
        }
        if key.contains(token) {
            score += 5;
        }
    }

    let segments = key.split('.').count() as i32;
    score + (5 - segments).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BaselineStatus;

    fn entry(id: &str, keys: &[&str], status: BaselineStatus) -> FeatureEntry {
        FeatureEntry::new(id, keys.iter().map(|k| k.to_string()).collect(), status)
    }

    #[test]
    fn test_exact_key_wins() {
        let features = vec![
            entry(
                "grid",
                &["css.properties.display.grid"],
                BaselineStatus::Widely,
            ),
            entry(
                "flex",
                &["css.properties.display.flex"],
                BaselineStatus::Widely,
            ),
        ];

        let m = best_match(&features, "display", "grid").unwrap();
        assert_eq!(m.entry.id, "grid");
        assert_eq!(m.key, "css.properties.display.grid");
    }

    #[test]
    fn test_prefix_tier_when_no_exact() {
        let features = vec![entry(
            "word-break",
            &["css.properties.word-break.break-all"],
            BaselineStatus::Widely,
        )];

        let m = best_match(&features, "word-break", "auto-phrase").unwrap();
        assert_eq!(m.key, "css.properties.word-break.break-all");
    }

    #[test]
    fn test_substring_tier_is_loosest() {
        let features = vec![entry(
            "masking",
            &["svg.elements.mask.css.properties.mask"],
            BaselineStatus::Limited,
        )];

        let m = best_match(&features, "mask", "url(#m)").unwrap();
        assert_eq!(m.entry.id, "masking");
    }

    #[test]
    fn test_no_candidates_is_none() {
        let features = vec![entry(
            "grid",
            &["css.properties.display.grid"],
            BaselineStatus::Widely,
        )];

        assert!(best_match(&features, "color-scheme", "light dark").is_none());
        assert!(best_match(&[], "display", "grid").is_none());
    }

    #[test]
    fn test_suffix_outranks_substring() {
        // Both keys contain the token; only one ends with it.
        let features = vec![entry(
            "anchor",
            &[
                "css.properties.position.anchored.top",
                "css.properties.position.anchored",
            ],
            BaselineStatus::Newly,
        )];

        let m = best_match(&features, "position", "anchored").unwrap();
        assert_eq!(m.key, "css.properties.position.anchored");
        assert!(m.score >= 15);
    }

    #[test]
    fn test_specificity_bonus_prefers_fewer_segments() {
        let features = vec![entry(
            "f",
            &[
                "css.properties.gap.row.deeply.nested",
                "css.properties.gap.row",
            ],
            BaselineStatus::Widely,
        )];

        let m = best_match(&features, "gap", "row").unwrap();
        assert_eq!(m.key, "css.properties.gap.row");
    }

    #[test]
    fn test_deterministic_first_wins_on_tie() {
        let features = vec![
            entry("a", &["css.properties.inset.auto"], BaselineStatus::Widely),
            entry("b", &["css.properties.inset.auto"], BaselineStatus::Limited),
        ];

        for _ in 0..10 {
            let m = best_match(&features, "inset", "auto").unwrap();
            assert_eq!(m.entry.id, "a");
        }
    }

    #[test]
    fn test_property_level_lookup() {
        let features = vec![
            entry(
                "grid",
                &["css.properties.display.grid"],
                BaselineStatus::Widely,
            ),
            entry(
                "subgrid",
                &["css.properties.grid-template-columns"],
                BaselineStatus::Limited,
            ),
        ];

        let found = property_level(&features, "css.properties.grid-template-columns").unwrap();
        assert_eq!(found.id, "subgrid");
        assert!(property_level(&features, "css.properties.display").is_none());
    }
}

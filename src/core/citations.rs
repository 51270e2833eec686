use crate::domain::model::{RawCitation, Source};
use std::collections::HashSet;

pub const UNTITLED_SOURCE: &str = "Verification Source";
pub const MISSING_URI: &str = "#";

/// Turns raw citations into sources, keeping the first occurrence of each URI.
/// Placeholders are applied before comparison, so every URI-less citation
/// collapses into one entry.
pub fn dedup_sources<I>(citations: I) -> Vec<Source>
where
    I: IntoIterator<Item = RawCitation>,
{
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for citation in citations {
        let uri = citation
            .uri
            .filter(|uri| !uri.is_empty())
            .unwrap_or_else(|| MISSING_URI.to_string());
        if !seen.insert(uri.clone()) {
            continue;
        }
        sources.push(Source {
            title: citation
                .title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| UNTITLED_SOURCE.to_string()),
            uri,
        });
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(title: &str, uri: &str) -> Source {
        Source {
            title: title.to_string(),
            uri: uri.to_string(),
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let raw = vec![
            RawCitation::new(Some("A"), Some("u1")),
            RawCitation::new(Some("B"), Some("u1")),
            RawCitation::new(Some("C"), Some("u2")),
        ];
        assert_eq!(
            dedup_sources(raw),
            vec![source("A", "u1"), source("C", "u2")]
        );
    }

    #[test]
    fn test_placeholders_for_missing_fields() {
        let raw = vec![
            RawCitation::new(None, Some("https://example.org/street")),
            RawCitation::new(Some("No link"), None),
            RawCitation::new(Some("Also no link"), None),
            RawCitation::new(Some("Empty link"), Some("")),
            RawCitation::new(Some(""), Some("https://example.org/map")),
        ];
        assert_eq!(
            dedup_sources(raw),
            vec![
                source(UNTITLED_SOURCE, "https://example.org/street"),
                source("No link", MISSING_URI),
                source(UNTITLED_SOURCE, "https://example.org/map"),
            ]
        );
    }

    #[test]
    fn test_order_is_input_order() {
        let raw = vec![
            RawCitation::new(Some("z"), Some("u9")),
            RawCitation::new(Some("a"), Some("u1")),
        ];
        let uris: Vec<String> = dedup_sources(raw).into_iter().map(|s| s.uri).collect();
        assert_eq!(uris, vec!["u9", "u1"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_sources(Vec::new()).is_empty());
    }
}

use tracing::{debug, trace};

use crate::extract::{extract, normalize_key};
use crate::protocol::MetaMap;
use crate::scan::tokenize;

/// Builds the [`MetaMap`] for a complete head section.
///
/// The meta tags are tokenized out of `head`, concatenated, and every extracted pair is
/// inserted under its normalized key. When two tags normalize to the same key the later
/// one wins. A head without usable meta tags gives an empty map.
pub fn parse_head(head: &str) -> MetaMap {
    let meta_text = tokenize(head).concat();

    let mut meta_map = MetaMap::new();
    for (raw_key, value) in extract(&meta_text) {
        let key = normalize_key(raw_key);
        if let Some(previous) = meta_map.insert(key, value.to_owned()) {
            trace!(raw_key, previous = %previous, value, "meta key overwritten");
        }
    }

    debug!(head_size = head.len(), meta_count = meta_map.len(), "parsed head");
    meta_map
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn description() {
        let head = r#"<head><title>x</title><meta name="description" content="hi"></head>"#;
        let meta_map = parse_head(head);
        assert_eq!(meta_map.len(), 1);
        assert_eq!(meta_map.get("description"), Some("hi"));
    }

    #[test]
    fn open_graph() {
        let head = r#"<head><meta property="og:title" content="Hello"><meta property="og:type" content="article"></head>"#;
        let meta_map = parse_head(head);
        assert_eq!(meta_map.iter().collect::<Vec<_>>(), vec![("ogTitle", "Hello"), ("ogType", "article")]);
    }

    #[test]
    fn later_duplicate_wins() {
        let head = indoc! {r#"
        <head>
            <meta property="og:title" content="first">
            <meta name="og_title" content="second">
        </head>"#};
        let meta_map = parse_head(head);
        assert_eq!(meta_map.len(), 1);
        assert_eq!(meta_map.get("ogTitle"), Some("second"));
    }

    #[test]
    fn real_world_head() {
        let head = indoc! {r#"
        <head>
            <meta charset="utf-8">
            <meta name="viewport" content="width=device-width, initial-scale=1">
            <title>A page</title>
            <meta name="twitter:card" content="summary_large_image">
            <meta name="twitter:site" content="@example">
            <meta property="og:image" content="https://example.com/a.png" />
            <link rel="canonical" href="https://example.com/">
        </head>"#};

        let meta_map = parse_head(head);
        assert_eq!(meta_map.get("viewport"), Some("width=device-width, initial-scale=1"));
        assert_eq!(meta_map.get("twitterCard"), Some("summary_large_image"));
        assert_eq!(meta_map.get("twitterSite"), Some("@example"));
        assert_eq!(meta_map.get("ogImage"), Some("https://example.com/a.png"));
        assert!(!meta_map.contains_key("charset"));
    }

    #[test]
    fn no_meta_tags() {
        assert!(parse_head("<head><title>nothing</title></head>").is_empty());
    }
}

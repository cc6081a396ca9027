//! Pulls `(key, content)` pairs out of concatenated meta tag text.
//!
//! A pair is produced for a `name` or `property` attribute followed, later in the same
//! tag, by a `content` attribute. Both values must be double-quoted. Attribute names
//! match case-insensitively; values are returned verbatim. When a tag carries several
//! `name`/`property` attributes, the last one before `content` is the key.
//!
//! # Limitations
//!
//! - `content` before `name`/`property` in the same tag yields no pair
//! - single-quoted or unquoted values yield no pair

use std::sync::OnceLock;

use regex::Regex;

/// `[^>]` keeps a match inside one tag when several tags are concatenated; the greedy
/// prefix from `<` settles on the last key attribute that still has a `content` after it
const META_ATTRIBUTE_PATTERN: &str = r#"(?i)<[^>]*\s(?:name|property)\s*=\s*"([^"]*)"[^>]*?\scontent\s*=\s*"([^"]*)""#;

fn meta_attribute_regex() -> &'static Regex {
    static META_ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    META_ATTRIBUTE.get_or_init(|| Regex::new(META_ATTRIBUTE_PATTERN).expect("valid regex"))
}

/// Returns every `(raw_key, value)` pair in `text`, in encounter order.
pub fn extract(text: &str) -> impl Iterator<Item = (&str, &str)> {
    meta_attribute_regex().captures_iter(text).filter_map(|captures| {
        let key = captures.get(1)?.as_str();
        let value = captures.get(2)?.as_str();
        Some((key, value))
    })
}

//! Splits head text into tags and keeps only the `<meta` ones.
//!
//! This is not an HTML parser: there is no nesting, no quoting awareness and no entity
//! handling. A tag is whatever runs from a `<` to the first following `>`.

use State::*;

/// Returns every `<...>` tag in `head` that contains `<meta` (ASCII case-insensitive),
/// in document order. The returned slices borrow from `head`.
///
/// A `<` seen inside a tag does not restart it, and a trailing tag that is never
/// closed is dropped.
pub fn tokenize(head: &str) -> Vec<&str> {
    let mut tags = Vec::new();
    let mut state = Outside;

    for (index, c) in head.char_indices() {
        state = match (state, c) {
            (Outside, '<') => Inside { start: index },
            (Inside { start }, '>') => {
                let tag = &head[start..=index];
                if is_meta_tag(tag) {
                    tags.push(tag);
                }
                Outside
            }
            (state, _) => state,
        };
    }

    tags
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Dropping text between tags
    Outside,
    /// Inside a tag that opened at byte offset `start`
    Inside { start: usize },
}

fn is_meta_tag(tag: &str) -> bool {
    const META_OPEN: &[u8] = b"<meta";
    tag.as_bytes().windows(META_OPEN.len()).any(|window| window.eq_ignore_ascii_case(META_OPEN))
}

/// Characters that split a raw key into segments
const SEPARATORS: [char; 2] = [':', '_'];

/// Turns a raw meta key into an identifier-style key.
///
/// A key without separators is returned unchanged. Otherwise the first segment is
/// lower-cased, every following segment gets an upper-case first character and a
/// lower-case remainder, and the segments are joined: `og:title` becomes `ogTitle`,
/// `DC_Title` becomes `dcTitle`.
pub fn normalize_key(raw_key: &str) -> String {
    if !raw_key.contains(SEPARATORS) {
        return raw_key.to_owned();
    }

    let mut segments = raw_key.split(SEPARATORS);
    let mut key = String::with_capacity(raw_key.len());

    if let Some(first) = segments.next() {
        key.push_str(&first.to_lowercase());
    }

    for segment in segments {
        let mut chars = segment.chars();
        if let Some(c) = chars.next() {
            key.extend(c.to_uppercase());
            key.push_str(&chars.as_str().to_lowercase());
        }
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators() {
        assert_eq!(normalize_key("og:title"), "ogTitle");
        assert_eq!(normalize_key("twitter:card"), "twitterCard");
        assert_eq!(normalize_key("twitter_site"), "twitterSite");
        assert_eq!(normalize_key("DC_Title"), "dcTitle");
        assert_eq!(normalize_key("og:image:SECURE_URL"), "ogImageSecureUrl");
    }

    #[test]
    fn single_segment_unchanged() {
        assert_eq!(normalize_key("description"), "description");
        assert_eq!(normalize_key("Description"), "Description");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn empty_segments() {
        assert_eq!(normalize_key("og::title"), "ogTitle");
        assert_eq!(normalize_key(":title"), "Title");
        assert_eq!(normalize_key("og:"), "og");
    }
}

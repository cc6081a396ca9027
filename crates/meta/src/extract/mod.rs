//! Turning head text into a [`MetaMap`](crate::protocol::MetaMap).
//!
//! - [`extract`]: `(raw_key, value)` pairs from concatenated meta tag text
//! - [`normalize_key`]: `og:title` style keys to `ogTitle` style keys
//! - [`parse_head`]: the full pipeline from head text to map

mod attribute_extractor;
mod head_parser;
mod key_normalizer;

pub use attribute_extractor::extract;
pub use head_parser::parse_head;
pub use key_normalizer::normalize_key;

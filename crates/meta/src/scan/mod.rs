//! Streaming side of head parsing.
//!
//! - [`HeadAccumulator`]: cuts the `<head>` section out of an arbitrarily chunked stream
//! - [`tokenize`]: splits the accumulated head text into `<meta ...>` tags

mod head_accumulator;
mod tag_tokenizer;

pub use head_accumulator::{DEFAULT_MAX_HEAD_BYTES, HEAD_CLOSE_TAG, HEAD_OPEN_TAG, HeadAccumulator, ScanSignal};
pub use tag_tokenizer::tokenize;

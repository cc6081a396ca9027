//! HTTP response body decoding
//!
//! - [`PayloadDecoder`]: selects the strategy from the decoded [`PayloadSize`](crate::protocol::PayloadSize)
//! - `ChunkedDecoder`: `Transfer-Encoding: chunked` bodies
//! - `LengthDecoder`: `Content-Length` bodies
//!
//! Every decoder hands data out as soon as it is buffered rather than waiting for a
//! complete chunk, so the head scanner sees `</head>` as early as possible.

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub use payload_decoder::PayloadDecoder;

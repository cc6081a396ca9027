//! HTTP header processing for the client side of a fetch
//!
//! - [`HeaderDecoder`]: decodes the response status line and headers
//!   - Selects the body framing from the status and headers
//!   - Manages header size limits
//!
//! - [`HeaderEncoder`]: encodes the request line and headers

mod header_decoder;
mod header_encoder;

pub use header_decoder::{HeaderDecoder, MAX_HEADER_BYTES, MAX_HEADER_NUM};
pub use header_encoder::HeaderEncoder;

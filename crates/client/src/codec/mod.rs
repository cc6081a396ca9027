//! HTTP codec module for the client side of a fetch
//!
//! - Request handling:
//!   - [`RequestEncoder`]: encodes the outgoing bodyless request
//!
//! - Response handling:
//!   - [`ResponseDecoder`]: decodes the incoming response
//!   - Header parsing via the `header` module
//!   - Payload decoding via the `body` module
//!
//! # Example
//!
//! ```no_run
//! use micro_meta_client::codec::{RequestEncoder, ResponseDecoder};
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! // Encode outgoing request
//! let mut encoder = RequestEncoder::new();
//! let mut request_buffer = BytesMut::new();
//! let request = http::Request::get("/").body(()).unwrap();
//! encoder.encode(request, &mut request_buffer).unwrap();
//!
//! // Decode incoming response
//! let mut decoder = ResponseDecoder::new();
//! let mut response_buffer = BytesMut::new();
//! let response = decoder.decode(&mut response_buffer);
//! ```

mod body;
mod header;
mod request_encoder;
mod response_decoder;

pub use header::{MAX_HEADER_BYTES, MAX_HEADER_NUM};
pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;

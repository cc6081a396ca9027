//! HTTP request header handling.
//!
//! The client only ever sends bodyless `GET` requests, so the header is the whole
//! request.

use http::Request;

/// Type alias for the HTTP request header written by the client.
pub type RequestHead = Request<()>;

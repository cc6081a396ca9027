//! Drives one request/response exchange over an async transport.
//!
//! [`MetaConnection`] writes the request with [`RequestEncoder`](crate::codec::RequestEncoder),
//! decodes the response with [`ResponseDecoder`](crate::codec::ResponseDecoder) and forwards
//! each body chunk to a [`StreamSession`](micro_meta::session::StreamSession).

mod meta_connection;

pub use meta_connection::MetaConnection;

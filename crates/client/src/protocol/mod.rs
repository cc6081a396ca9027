//! HTTP protocol types used by the client side of a fetch.
//!
//! - **Message Handling** ([`message`]): [`Message`], [`PayloadItem`] and [`PayloadSize`]
//! - **Request** ([`request`]): [`RequestHead`], the bodyless `GET` sent to the server
//! - **Response** ([`response`]): [`ResponseHeader`], the decoded status line and headers
//! - **Error Handling** ([`error`]): [`ParseError`] for decoding, [`SendError`] for encoding
//!
//! None of these types know about meta tags; the connection layer hands payload chunks
//! to a [`StreamSession`](micro_meta::session::StreamSession).

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod request;
pub use request::RequestHead;

mod response;
pub use response::ResponseHeader;

mod error;
pub use error::ParseError;
pub use error::SendError;

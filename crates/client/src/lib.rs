//! An asynchronous HTTP/1.1 client that reads a page only up to its `</head>`
//!
//! This crate is the transport side of [`micro_meta`]. It opens a plain TCP connection,
//! sends a single `GET`, decodes the response as it streams in and feeds the body into a
//! [`StreamSession`](micro_meta::session::StreamSession). As soon as the session has
//! seen `</head>` (or failed) the connection is dropped, so the body of the document
//! is never downloaded.
//!
//! # Example
//!
//! ```no_run
//! use micro_meta_client::Scraper;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let scraper = Scraper::builder()
//!         .host("http://example.com")
//!         .path("/")
//!         .timeout(Duration::from_secs(5))
//!         .build()
//!         .unwrap();
//!
//!     scraper
//!         .scrape_with(|result| match result {
//!             Ok(meta_map) => {
//!                 for (key, value) in meta_map.iter() {
//!                     println!("{key}: {value}");
//!                 }
//!             }
//!             Err(e) => eprintln!("scrape failed: {e}"),
//!         })
//!         .await;
//! }
//! ```
//!
//! # Architecture
//!
//! - [`scraper`]: builder-based configuration and the fetch entry point
//! - [`connection`]: drives one request/response exchange into a session
//! - [`codec`]: request encoding and response decoding
//! - [`protocol`]: message types and errors
//!
//! # Response bodies
//!
//! - `Content-Length`: exactly that many bytes
//! - `Transfer-Encoding: chunked`: decoded incrementally, chunk data is forwarded before
//!   the whole chunk arrived
//! - neither: read until the server closes the connection
//! - `1xx`, `204` and `304`: no body
//!
//! # Limitations
//!
//! - Plain HTTP only, no TLS; an `https://` host fails to build
//! - No redirects; any status other than `200` fails the fetch
//! - No content decoding, `Accept-Encoding: identity` is always sent
//! - Maximum response header size: 8KB
//! - Maximum number of response headers: 64

pub mod codec;
pub mod connection;
pub mod protocol;
pub mod scraper;

mod utils;
pub(crate) use utils::ensure;

pub use scraper::{Scraper, ScraperBuildError, ScraperBuilder};

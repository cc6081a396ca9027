//! Incremental `<head>` scanner and `<meta>` tag extractor
//!
//! This crate pulls `<meta>` name/content pairs out of the `<head>` section of an HTML
//! document that arrives as an arbitrarily chunked byte stream. It never looks past
//! `</head>`, so a transport can stop reading the response as soon as the session
//! reports a terminal state.
//!
//! # Example
//!
//! ```
//! use micro_meta::session::StreamSession;
//!
//! let mut session = StreamSession::new("example.com", "/");
//! session.on_chunk("<html><he");
//! session.on_chunk("ad><meta property=\"og:title\" content=\"Hello\"></head><body>");
//! assert!(session.is_terminal());
//!
//! let meta_map = session.into_result().unwrap();
//! assert_eq!(meta_map.get("ogTitle"), Some("Hello"));
//! ```
//!
//! # Architecture
//!
//! - [`scan`]: the chunk accumulator and the tag tokenizer
//! - [`extract`]: attribute extraction, key normalization and the head parsing pipeline
//! - [`session`]: per-fetch state driven by chunk, error and end signals
//! - [`protocol`]: the [`MetaMap`](protocol::MetaMap) result and [`MetaError`](protocol::MetaError)
//!
//! # Limitations
//!
//! - `<head>` and `</head>` are matched case-sensitively and literally
//! - only double-quoted attribute values are recognized
//! - `content` must follow `name`/`property` within the tag
//! - no character-encoding detection; the head is decoded as UTF-8 (lossy)

pub mod extract;
pub mod protocol;
pub mod scan;
pub mod session;

//! Result and error types shared by the scanner, the session and the transport.
//!
//! - [`MetaMap`]: normalized meta key to content value, the successful outcome of a fetch
//! - [`MetaError`]: every terminal failure a fetch can end with

mod meta_map;
pub use meta_map::MetaMap;

mod error;
pub use error::MetaError;

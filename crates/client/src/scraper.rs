//! Builder-configured entry point that fetches one page and returns its meta tags.
//!
//! # Example
//!
//! ```no_run
//! use micro_meta_client::Scraper;
//!
//! #[tokio::main]
//! async fn main() {
//!     let scraper = Scraper::builder().host("http://example.com").path("/blog/post").build().unwrap();
//!     match scraper.scrape().await {
//!         Ok(meta_map) => println!("{:?}", meta_map.get("ogTitle")),
//!         Err(e) => eprintln!("scrape failed: {e}"),
//!     }
//! }
//! ```

use std::io;
use std::time::Duration;

use http::header::{ACCEPT, ACCEPT_ENCODING, CONNECTION, HOST, USER_AGENT};
use http::{HeaderValue, Request};
use thiserror::Error;
use tokio::net::TcpStream;
use tracing::{debug, error, warn};

use micro_meta::protocol::{MetaError, MetaMap};
use micro_meta::scan::HeadAccumulator;
use micro_meta::session::StreamSession;

use crate::connection::MetaConnection;
use crate::protocol::RequestHead;

pub use micro_meta::scan::DEFAULT_MAX_HEAD_BYTES;

pub const DEFAULT_PORT: u16 = 80;

pub const DEFAULT_PATH: &str = "/";

/// Bound on the whole fetch: connect, request and reading up to `</head>`
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str = concat!("micro-meta/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub struct ScraperBuilder {
    host: Option<String>,
    path: Option<String>,
    port: Option<u16>,
    timeout: Duration,
    max_head_bytes: usize,
    user_agent: String,
}

impl ScraperBuilder {
    fn new() -> Self {
        Self {
            host: None,
            path: None,
            port: None,
            timeout: DEFAULT_TIMEOUT,
            max_head_bytes: DEFAULT_MAX_HEAD_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Sets the host, optionally prefixed with `http://` and suffixed with `:port`
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the port, overriding a port given in the host
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_head_bytes(mut self, max_head_bytes: usize) -> Self {
        self.max_head_bytes = max_head_bytes;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<Scraper, ScraperBuildError> {
        let raw_host = self.host.ok_or(ScraperBuildError::MissingHost)?;
        let (scheme, rest) = split_scheme(raw_host.trim());
        if let Some(scheme) = scheme
            && !scheme.eq_ignore_ascii_case("http")
        {
            return Err(ScraperBuildError::UnsupportedScheme { scheme: scheme.to_string() });
        }

        let (host, embedded_port) = split_host(rest)?;
        let port = self.port.or(embedded_port).unwrap_or(DEFAULT_PORT);

        let path = self.path.unwrap_or_else(|| DEFAULT_PATH.to_string());
        if !path.starts_with('/') {
            return Err(ScraperBuildError::InvalidPath { path });
        }

        let host_header = if port == DEFAULT_PORT { host.to_string() } else { format!("{host}:{port}") };
        let host_header =
            HeaderValue::from_str(&host_header).map_err(|_| ScraperBuildError::InvalidHost { host: raw_host.clone() })?;
        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|_| ScraperBuildError::InvalidUserAgent { user_agent: self.user_agent.clone() })?;

        Ok(Scraper {
            host: host.to_string(),
            port,
            path,
            timeout: self.timeout,
            max_head_bytes: self.max_head_bytes,
            host_header,
            user_agent,
        })
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScraperBuildError {
    #[error("host must be set")]
    MissingHost,
    #[error("invalid host: {host}")]
    InvalidHost { host: String },
    #[error("path must start with '/': {path}")]
    InvalidPath { path: String },
    #[error("invalid user agent: {user_agent}")]
    InvalidUserAgent { user_agent: String },
    #[error("unsupported scheme {scheme}, only plain http is supported")]
    UnsupportedScheme { scheme: String },
}

/// Splits a leading `scheme://` off the host.
pub fn split_scheme(host: &str) -> (Option<&str>, &str) {
    let is_scheme = |scheme: &str| {
        !scheme.is_empty() && scheme.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
    };

    match host.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => (Some(scheme), rest),
        _ => (None, host),
    }
}

fn split_host(host: &str) -> Result<(&str, Option<u16>), ScraperBuildError> {
    let invalid = || ScraperBuildError::InvalidHost { host: host.to_string() };

    let (name, port) = match host.rsplit_once(':') {
        Some((name, port)) => (name, Some(port.parse::<u16>().map_err(|_| invalid())?)),
        None => (host, None),
    };

    if name.is_empty() || name.contains(['/', ':', ' ', '?', '#']) {
        return Err(invalid());
    }

    Ok((name, port))
}

/// Fetches the head of one page over plain HTTP/1.1.
///
/// A `Scraper` holds only configuration, so it can be reused and shared; every call to
/// [`scrape`](Scraper::scrape) opens its own connection and runs its own session.
#[derive(Debug, Clone)]
pub struct Scraper {
    host: String,
    port: u16,
    path: String,
    timeout: Duration,
    max_head_bytes: usize,
    host_header: HeaderValue,
    user_agent: HeaderValue,
}

impl Scraper {
    pub fn builder() -> ScraperBuilder {
        ScraperBuilder::new()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn scrape(&self) -> Result<MetaMap, MetaError> {
        match tokio::time::timeout(self.timeout, self.do_scrape()).await {
            Ok(result) => result,
            Err(elapsed) => {
                warn!(host = %self.host, path = %self.path, timeout = ?self.timeout, "scrape timed out");
                Err(MetaError::transport(io::Error::new(io::ErrorKind::TimedOut, elapsed)))
            }
        }
    }

    /// Runs [`scrape`](Scraper::scrape) and hands the outcome to `callback`, exactly once.
    pub async fn scrape_with<F>(&self, callback: F)
    where
        F: FnOnce(Result<MetaMap, MetaError>),
    {
        callback(self.scrape().await);
    }

    async fn do_scrape(&self) -> Result<MetaMap, MetaError> {
        debug!(host = %self.host, port = self.port, path = %self.path, "connecting");
        let tcp_stream = TcpStream::connect((self.host.as_str(), self.port)).await.map_err(|e| {
            error!(host = %self.host, port = self.port, cause = %e, "connect error");
            MetaError::transport(e)
        })?;

        let request = self.build_request()?;
        let session = StreamSession::with_accumulator(
            self.host.as_str(),
            self.path.as_str(),
            HeadAccumulator::with_max_head_bytes(self.max_head_bytes),
        );

        let (reader, writer) = tcp_stream.into_split();
        MetaConnection::new(reader, writer).fetch(request, session).await
    }

    fn build_request(&self) -> Result<RequestHead, MetaError> {
        Request::get(self.path.as_str())
            .header(HOST, self.host_header.clone())
            .header(USER_AGENT, self.user_agent.clone())
            .header(ACCEPT, HeaderValue::from_static("text/html"))
            .header(ACCEPT_ENCODING, HeaderValue::from_static("identity"))
            .header(CONNECTION, HeaderValue::from_static("close"))
            .body(())
            .map_err(MetaError::transport)
    }
}

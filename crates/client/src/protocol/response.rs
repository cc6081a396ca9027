//! HTTP response header handling.
//!
//! Wraps `http::Response<()>` so the connection can inspect the status line and
//! headers before deciding whether the body is worth reading at all.

use http::{HeaderMap, Response, StatusCode, Version};

/// Represents a decoded HTTP response header.
#[derive(Debug)]
pub struct ResponseHeader {
    inner: Response<()>,
}

impl ResponseHeader {
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub fn version(&self) -> Version {
        self.inner.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Determines if this response carries a body based on its status code.
    ///
    /// Returns false for the statuses that never have one:
    /// - 1xx informational
    /// - 204 No Content
    /// - 304 Not Modified
    pub fn need_body(&self) -> bool {
        let status = self.status();
        !(status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED)
    }
}

/// Converts a bodyless response into a ResponseHeader.
impl From<Response<()>> for ResponseHeader {
    #[inline]
    fn from(inner: Response<()>) -> Self {
        Self { inner }
    }
}

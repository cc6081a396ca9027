//! HTTP header encoder implementation for serializing HTTP request headers
//!
//! Writes the request line and header fields of a bodyless request. The client never
//! sends a body, so no framing headers are added here.

use crate::protocol::{RequestHead, SendError};

use bytes::{BufMut, BytesMut};

use http::Version;
use std::io;
use std::io::{ErrorKind, Write};
use tokio_util::codec::Encoder;
use tracing::error;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 1024;

/// Encoder for HTTP request headers implementing the [`Encoder`] trait.
#[derive(Debug)]
pub struct HeaderEncoder;

impl Encoder<&RequestHead> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the request line and headers into the provided bytes buffer.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - HTTP version is not supported (only HTTP/1.1 supported)
    /// - Writing to buffer fails
    fn encode(&mut self, head: &RequestHead, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        let target = head.uri().path_and_query().map_or("/", |path_and_query| path_and_query.as_str());
        match head.version() {
            Version::HTTP_11 => {
                write!(FastWrite(dst), "{} {} HTTP/1.1\r\n", head.method().as_str(), target)?;
            }
            v => {
                error!(http_version = ?v, "unsupported http version");
                return Err(io::Error::from(ErrorKind::Unsupported).into());
            }
        }

        for (header_name, header_value) in head.headers() {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Avoids going through `bytes::buf::Writer` since space was already reserved.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Request, header};

    #[test]
    fn request_line_and_headers() {
        let head = Request::builder()
            .method(Method::GET)
            .uri("/blog/post?id=1")
            .header(header::HOST, "example.com")
            .header(header::CONNECTION, "close")
            .body(())
            .unwrap();

        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&head, &mut dst).unwrap();

        assert_eq!(&dst[..], &b"GET /blog/post?id=1 HTTP/1.1\r\nhost: example.com\r\nconnection: close\r\n\r\n"[..]);
    }

    #[test]
    fn unsupported_version() {
        let head = Request::builder().uri("/").version(Version::HTTP_2).body(()).unwrap();
        let mut dst = BytesMut::new();
        assert!(matches!(HeaderEncoder.encode(&head, &mut dst), Err(SendError::Io { .. })));
    }
}

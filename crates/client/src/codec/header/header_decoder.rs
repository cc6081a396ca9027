//! HTTP header decoder implementation for parsing HTTP response headers
//!
//! This module decodes the status line and header fields of a response from raw bytes
//! into a [`ResponseHeader`], and decides how the body that follows is framed.
//!
//! # Limits
//!
//! - Maximum number of headers: 64
//! - Maximum header size: 8KB
//! - Only supports HTTP/1.0 and HTTP/1.1 (HTTP/2 and HTTP/3 currently not supported)

use bytes::{Buf, BytesMut};
use http::{HeaderName, HeaderValue, Response, StatusCode};
use httparse::{Error, Status};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::ensure;

use crate::protocol::{ParseError, PayloadSize, ResponseHeader};

/// Maximum number of headers allowed in a response
pub const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the entire header section
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Shortest status line we can make progress on: "HTTP/1.1 200\r\n"
const MIN_STATUS_LINE: usize = 14;

/// Decoder for HTTP response headers implementing the [`Decoder`] trait.
///
/// This decoder parses raw bytes into a structured [`ResponseHeader`] and determines the
/// [`PayloadSize`] of the body from the status, `Content-Length` and `Transfer-Encoding`.
#[derive(Debug)]
pub struct HeaderDecoder;

impl Decoder for HeaderDecoder {
    type Item = (ResponseHeader, PayloadSize);
    type Error = ParseError;

    /// Attempts to decode HTTP response headers from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((header, payload_size)))` if a complete header was successfully parsed
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if parsing failed
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The number of headers exceeds `MAX_HEADER_NUM`
    /// - The total header size exceeds `MAX_HEADER_BYTES`
    /// - The HTTP version or status code is not valid
    /// - Headers contain invalid characters
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < MIN_STATUS_LINE {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut res = httparse::Response::new(&mut headers);

        let parsed_result = res.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            e => ParseError::invalid_header(e.to_string()),
        });

        let body_offset = match parsed_result? {
            Status::Complete(body_offset) => body_offset,
            // If parsing incomplete, ensure current buffer size does not exceed limit
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
        };

        trace!(header_size = body_offset, "parsed response header");
        ensure!(body_offset <= MAX_HEADER_BYTES, ParseError::too_large_header(body_offset, MAX_HEADER_BYTES));

        let version = match res.version {
            Some(0) => http::Version::HTTP_10,
            Some(1) => http::Version::HTTP_11,
            _ => return Err(ParseError::InvalidVersion(res.version)),
        };

        let status = res.code.and_then(|code| StatusCode::from_u16(code).ok()).ok_or(ParseError::InvalidStatus(res.code))?;

        let mut header_builder = Response::builder().status(status).version(version);
        if let Some(header_map) = header_builder.headers_mut() {
            header_map.reserve(res.headers.len());
            for header in res.headers.iter() {
                let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
                let value = HeaderValue::from_bytes(header.value).map_err(ParseError::invalid_header)?;
                header_map.append(name, value);
            }
        }

        let header = ResponseHeader::from(header_builder.body(()).map_err(ParseError::invalid_header)?);
        src.advance(body_offset);

        let payload_size = parse_payload(&header)?;
        Ok(Some((header, payload_size)))
    }
}

/// Determines how the response body is framed.
///
/// Refer to RFC 9112 section 6.3:
/// - no body for 1xx, 204 and 304
/// - chunked if `Transfer-Encoding` ends with `chunked`
/// - fixed length if `Content-Length` is present
/// - otherwise the body runs until the server closes the connection
///
/// # Errors
///
/// Returns `ParseError` if:
/// - Both Content-Length and Transfer-Encoding headers are present
/// - Content-Length value is invalid
fn parse_payload(header: &ResponseHeader) -> Result<PayloadSize, ParseError> {
    if !header.need_body() {
        return Ok(PayloadSize::Empty);
    }

    let te_header = header.headers().get(http::header::TRANSFER_ENCODING);
    let cl_header = header.headers().get(http::header::CONTENT_LENGTH);

    match (te_header, cl_header) {
        (None, None) => Ok(PayloadSize::UntilClose),

        (te_value @ Some(_), None) => {
            if is_chunked(te_value) {
                Ok(PayloadSize::Chunked)
            } else {
                Ok(PayloadSize::UntilClose)
            }
        }

        (None, Some(cl_value)) => {
            let cl_str = cl_value.to_str().map_err(|_| ParseError::invalid_content_length("value can't to_str"))?;

            let length =
                cl_str.trim().parse::<u64>().map_err(|_| ParseError::invalid_content_length(format!("value {cl_str} is not u64")))?;

            Ok(PayloadSize::new_length(length))
        }

        (Some(_), Some(_)) => Err(ParseError::invalid_content_length("transfer_encoding and content_length both present in headers")),
    }
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// According to RFC 7230, chunked must be the last encoding if present.
fn is_chunked(header_value: Option<&HeaderValue>) -> bool {
    const CHUNKED: &[u8] = b"chunked";
    if let Some(value) = header_value {
        if let Some(bytes) = value.as_bytes().rsplit(|b| *b == b',').next() {
            return bytes.trim_ascii() == CHUNKED;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Version};
    use indoc::indoc;

    #[test]
    fn check_is_chunked() {
        {
            let headers = HeaderMap::new();
            assert!(!is_chunked(headers.get(http::header::TRANSFER_ENCODING)));
        }

        {
            let mut headers = HeaderMap::new();
            headers.insert("Transfer-Encoding", "gzip, chunked".parse().unwrap());
            assert!(is_chunked(headers.get(http::header::TRANSFER_ENCODING)));
        }

        {
            let mut headers = HeaderMap::new();
            headers.insert("Transfer-Encoding", "chunked, gzip".parse().unwrap());
            assert!(!is_chunked(headers.get(http::header::TRANSFER_ENCODING)));
        }
    }

    #[test]
    fn from_nginx() {
        let str = indoc! {r##"
        HTTP/1.1 200 OK
        Server: nginx
        Content-Type: text/html; charset=utf-8
        Content-Length: 13
        Connection: close

        <html></html>"##};

        let mut buf = BytesMut::from(str);

        let (header, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();

        assert_eq!(payload_size, PayloadSize::Length(13));
        assert_eq!(header.status(), StatusCode::OK);
        assert_eq!(header.version(), Version::HTTP_11);
        assert_eq!(header.headers().len(), 4);
        assert_eq!(header.headers().get(http::header::SERVER), Some(&HeaderValue::from_static("nginx")));
        assert_eq!(&buf[..], b"<html></html>");
    }

    #[test]
    fn chunked_body() {
        let str = indoc! {r##"
        HTTP/1.1 200 OK
        Transfer-Encoding: chunked

        "##};

        let mut buf = BytesMut::from(str);
        let (_, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();
        assert!(payload_size.is_chunked());
        assert!(buf.is_empty());
    }

    #[test]
    fn until_close_body() {
        let mut buf = BytesMut::from("HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\n<head>");
        let (header, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(header.version(), Version::HTTP_10);
        assert_eq!(payload_size, PayloadSize::UntilClose);
        assert_eq!(&buf[..], b"<head>");
    }

    #[test]
    fn no_body_status() {
        let mut buf = BytesMut::from("HTTP/1.1 304 Not Modified\r\nContent-Length: 100\r\n\r\n");
        let (header, payload_size) = HeaderDecoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(header.status(), StatusCode::NOT_MODIFIED);
        assert!(payload_size.is_empty());
    }

    #[test]
    fn partial_header() {
        let mut buf = BytesMut::from("HTTP/1.1 200 OK\r\nContent-Le");
        assert!(HeaderDecoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 27);
    }

    #[test]
    fn too_large_header() {
        let mut buf = BytesMut::from("HTTP/1.1 200 OK\r\nX-Padding: ");
        buf.extend_from_slice(&[b'a'; MAX_HEADER_BYTES]);
        assert!(matches!(HeaderDecoder.decode(&mut buf), Err(ParseError::TooLargeHeader { .. })));
    }

    #[test]
    fn both_length_and_chunked() {
        let mut buf = BytesMut::from("HTTP/1.1 200 OK\r\nContent-Length: 3\r\nTransfer-Encoding: chunked\r\n\r\n");
        assert!(matches!(HeaderDecoder.decode(&mut buf), Err(ParseError::InvalidContentLength { .. })));
    }

    #[test]
    fn invalid_status_line() {
        let mut buf = BytesMut::from("SMTP/1.1 200 OK\r\n\r\n");
        assert!(matches!(HeaderDecoder.decode(&mut buf), Err(ParseError::InvalidHeader { .. })));
    }
}

//! HTTP response decoder module
//!
//! Decodes a response in two phases through a small state machine:
//!
//! - header parsing with [`HeaderDecoder`]
//! - payload decoding with [`PayloadDecoder`], selected from the decoded header
//!
//! # Example
//!
//! ```
//! use micro_meta_client::codec::ResponseDecoder;
//! use micro_meta_client::protocol::Message;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = ResponseDecoder::new();
//! let mut buffer = BytesMut::from("HTTP/1.1 200 OK\r\nContent-Length: 6\r\n\r\n<head>");
//! assert!(matches!(decoder.decode(&mut buffer), Ok(Some(Message::Header(_)))));
//! assert!(matches!(decoder.decode(&mut buffer), Ok(Some(Message::Payload(_)))));
//! ```

use crate::codec::body::PayloadDecoder;
use crate::codec::header::HeaderDecoder;
use crate::protocol::{Message, ParseError, PayloadItem, ResponseHeader};
use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

/// A decoder for HTTP responses that handles both headers and payload
///
/// # State Machine
///
/// The decoder maintains its state through the `payload_decoder` field:
/// - `None`: Currently parsing headers
/// - `Some(PayloadDecoder)`: Currently parsing payload
///
/// Interim `1xx` responses such as `103 Early Hints` are consumed while parsing headers
/// and never yielded.
#[derive(Debug)]
pub struct ResponseDecoder {
    header_decoder: HeaderDecoder,
    payload_decoder: Option<PayloadDecoder>,
}

impl ResponseDecoder {
    /// Creates a new `ResponseDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self { header_decoder: HeaderDecoder, payload_decoder: None }
    }
}

impl Decoder for ResponseDecoder {
    type Item = Message<ResponseHeader>;
    type Error = ParseError;

    /// Attempts to decode an HTTP response from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Message::Header(_)))`: Successfully decoded response headers
    /// - `Ok(Some(Message::Payload(_)))`: Successfully decoded a payload chunk or EOF
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: Encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // parse payload if have payload_decoder
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let message = match payload_decoder.decode(src)? {
                Some(item @ PayloadItem::Chunk(_)) => Some(Message::Payload(item)),
                Some(item @ PayloadItem::Eof) => {
                    // no need payload decoder in this response now
                    self.payload_decoder.take();
                    Some(Message::Payload(item))
                }
                None => None,
            };

            return Ok(message);
        }

        // parse response header, interim 1xx responses carry no body and are dropped
        loop {
            match self.header_decoder.decode(src)? {
                Some((header, _)) if header.status().is_informational() => {
                    trace!(status = %header.status(), "skip interim response");
                }
                Some((header, payload_size)) => {
                    trace!(status = %header.status(), ?payload_size, "decoded response header");
                    self.payload_decoder = Some(payload_size.into());
                    return Ok(Some(Message::Header(header)));
                }
                None => return Ok(None),
            }
        }
    }

    /// Called once the underlying reader is exhausted.
    ///
    /// An until-close payload ends here. Any other unfinished header or payload means
    /// the server hung up early.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(message) = self.decode(src)? {
            return Ok(Some(message));
        }

        match self.payload_decoder.as_ref().map(PayloadDecoder::is_until_close) {
            Some(true) => {
                self.payload_decoder.take();
                Ok(Some(Message::Payload(PayloadItem::Eof)))
            }
            Some(false) => Err(ParseError::invalid_body("connection closed before payload completed")),
            None if src.is_empty() => Ok(None),
            None => Err(ParseError::invalid_header("connection closed before header completed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use indoc::indoc;

    fn drain(decoder: &mut ResponseDecoder, buffer: &mut BytesMut, eof: bool) -> Result<Vec<Message<ResponseHeader>>, ParseError> {
        let mut messages = Vec::new();
        loop {
            let next = if eof { decoder.decode_eof(buffer)? } else { decoder.decode(buffer)? };
            match next {
                Some(message) => messages.push(message),
                None => return Ok(messages),
            }
        }
    }

    #[test]
    fn length_response() {
        let str = indoc! {r##"
        HTTP/1.1 200 OK
        Content-Length: 13

        <head></head>"##};

        let mut buffer = BytesMut::from(str);
        let mut decoder = ResponseDecoder::new();
        let messages = drain(&mut decoder, &mut buffer, false).unwrap();

        assert_eq!(messages.len(), 3);
        assert!(matches!(&messages[0], Message::Header(header) if header.status() == StatusCode::OK));
        assert!(matches!(&messages[1], Message::Payload(PayloadItem::Chunk(bytes)) if bytes == &Bytes::from_static(b"<head></head>")));
        assert!(matches!(&messages[2], Message::Payload(PayloadItem::Eof)));
    }

    #[test]
    fn interim_responses_skipped() {
        let str = indoc! {r##"
        HTTP/1.1 100 Continue

        HTTP/1.1 103 Early Hints
        Link: </style.css>; rel=preload; as=style

        HTTP/1.1 200 OK
        Content-Length: 6

        <head>"##};

        let mut buffer = BytesMut::from(str);
        let mut decoder = ResponseDecoder::new();
        let messages = drain(&mut decoder, &mut buffer, false).unwrap();

        assert_eq!(messages.len(), 3);
        assert!(matches!(&messages[0], Message::Header(header) if header.status() == StatusCode::OK));
        assert!(matches!(&messages[1], Message::Payload(PayloadItem::Chunk(bytes)) if bytes == &Bytes::from_static(b"<head>")));
        assert!(matches!(&messages[2], Message::Payload(PayloadItem::Eof)));
    }

    #[test]
    fn interim_response_then_partial_final_header() {
        let mut buffer = BytesMut::from("HTTP/1.1 103 Early Hints\r\n\r\nHTTP/1.1 200 OK\r\nContent-");
        let mut decoder = ResponseDecoder::new();
        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert_eq!(&buffer[..], b"HTTP/1.1 200 OK\r\nContent-");

        buffer.extend_from_slice(b"Length: 0\r\n\r\n");
        let messages = drain(&mut decoder, &mut buffer, false).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], Message::Header(header) if header.status() == StatusCode::OK));
        assert!(matches!(&messages[1], Message::Payload(PayloadItem::Eof)));
    }

    #[test]
    fn until_close_response_ends_at_eof() {
        let mut buffer = BytesMut::from("HTTP/1.0 200 OK\r\n\r\n<html><head>");
        let mut decoder = ResponseDecoder::new();

        let messages = drain(&mut decoder, &mut buffer, false).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_header());

        let messages = drain(&mut decoder, &mut buffer, true).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(matches!(&messages[0], Message::Payload(PayloadItem::Eof)));
    }

    #[test]
    fn truncated_length_body_is_error() {
        let mut buffer = BytesMut::from("HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n<head>");
        let mut decoder = ResponseDecoder::new();

        assert_eq!(drain(&mut decoder, &mut buffer, false).unwrap().len(), 2);
        assert!(matches!(drain(&mut decoder, &mut buffer, true), Err(ParseError::InvalidBody { .. })));
    }

    #[test]
    fn truncated_header_is_error() {
        let mut buffer = BytesMut::from("HTTP/1.1 200 OK\r\nContent-");
        let mut decoder = ResponseDecoder::new();
        assert!(matches!(drain(&mut decoder, &mut buffer, true), Err(ParseError::InvalidHeader { .. })));
    }

    #[test]
    fn clean_close_without_response() {
        let mut buffer = BytesMut::new();
        let mut decoder = ResponseDecoder::new();
        assert!(drain(&mut decoder, &mut buffer, true).unwrap().is_empty());
    }
}

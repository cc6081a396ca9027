//! Decoder for response bodies sent with `Transfer-Encoding: chunked`.
//!
//! See [RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1). Chunk
//! extensions and trailer fields are read and dropped. Data is handed out as soon as it
//! arrives, without waiting for a whole chunk, so a `</head>` early in a large chunk ends
//! the fetch without reading the rest of it.

use crate::protocol::{ParseError, PayloadItem};
use bytes::{Buf, Bytes, BytesMut};
use std::io;
use std::io::ErrorKind;
use std::task::Poll;
use tokio_util::codec::Decoder;
use tracing::trace;
use ChunkedState::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
    remaining_size: u64,
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self { state: SizeStart, remaining_size: 0 }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// First hex digit of the chunk size, required
    SizeStart,
    /// Further hex digits of the chunk size
    Size,
    /// Whitespace after the size
    SizeLws,
    /// Chunk extension, ignored
    Extension,
    /// LF ending the size line
    SizeLf,
    /// Chunk data
    Body,
    /// CR after chunk data
    BodyCr,
    /// LF after chunk data
    BodyLf,
    /// Trailer field, ignored
    Trailer,
    /// LF ending a trailer field
    TrailerLf,
    /// CR of the final empty line
    EndCr,
    /// LF of the final empty line
    EndLf,
    End,
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    /// # Returns
    /// - `Ok(Some(PayloadItem::Chunk(bytes)))` for every run of chunk data available
    /// - `Ok(Some(PayloadItem::Eof))` once the last chunk and trailers were read
    /// - `Ok(None)` when more data is needed
    /// - `Err(ParseError)` if the chunked framing is invalid
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            if self.state == End {
                trace!("finished reading chunked data");
                return Ok(Some(PayloadItem::Eof));
            }

            if src.is_empty() {
                return Ok(None);
            }

            let mut buf = None;

            self.state = match self.state.step(src, &mut self.remaining_size, &mut buf) {
                Poll::Pending => return Ok(None),
                Poll::Ready(Ok(new_state)) => new_state,
                Poll::Ready(Err(e)) => return Err(ParseError::io(e)),
            };

            if let Some(bytes) = buf {
                trace!(len = bytes.len(), "read chunked bytes");
                return Ok(Some(PayloadItem::Chunk(bytes)));
            }
        }
    }
}

fn invalid(reason: &'static str) -> Poll<Result<ChunkedState, io::Error>> {
    Poll::Ready(Err(io::Error::new(ErrorKind::InvalidInput, reason)))
}

impl ChunkedState {
    /// Advances the state machine by one byte, or by one run of chunk data in `Body`.
    fn step(self, src: &mut BytesMut, remaining_size: &mut u64, buf: &mut Option<Bytes>) -> Poll<Result<ChunkedState, io::Error>> {
        if self == Body {
            return Poll::Ready(Ok(read_body(src, remaining_size, buf)));
        }
        if self == End {
            return Poll::Ready(Ok(End));
        }

        if src.is_empty() {
            return Poll::Pending;
        }
        let byte = src.get_u8();

        match (self, byte) {
            (SizeStart | Size, b) if b.is_ascii_hexdigit() => {
                let digit = u64::from(hex_value(b));
                match remaining_size.checked_mul(16).and_then(|size| size.checked_add(digit)) {
                    Some(size) => {
                        *remaining_size = size;
                        Poll::Ready(Ok(Size))
                    }
                    None => invalid("invalid overflow chunked length"),
                }
            }
            (SizeStart, _) => invalid("invalid chunk size line: missing size"),
            (Size | SizeLws, b'\t' | b' ') => Poll::Ready(Ok(SizeLws)),
            (Size | SizeLws, b';') => Poll::Ready(Ok(Extension)),
            (Size | SizeLws | Extension, b'\r') => Poll::Ready(Ok(SizeLf)),
            (Size, _) => invalid("invalid chunk size line: Invalid Size"),
            (SizeLws, _) => invalid("invalid chunk size linear white space"),
            (Extension, b'\n') => invalid("invalid chunk extension contains newline"),
            (Extension, _) => Poll::Ready(Ok(Extension)),
            (SizeLf, b'\n') if *remaining_size == 0 => Poll::Ready(Ok(EndCr)),
            (SizeLf, b'\n') => Poll::Ready(Ok(Body)),
            (SizeLf, _) => invalid("invalid chunk size LF"),
            (BodyCr, b'\r') => Poll::Ready(Ok(BodyLf)),
            (BodyCr, _) => invalid("invalid chunk body CR"),
            (BodyLf, b'\n') => Poll::Ready(Ok(SizeStart)),
            (BodyLf, _) => invalid("invalid chunk body LF"),
            (Trailer, b'\r') => Poll::Ready(Ok(TrailerLf)),
            (Trailer, _) => Poll::Ready(Ok(Trailer)),
            (TrailerLf, b'\n') => Poll::Ready(Ok(EndCr)),
            (TrailerLf, _) => invalid("invalid trailer end LF"),
            (EndCr, b'\r') => Poll::Ready(Ok(EndLf)),
            (EndCr, _) => Poll::Ready(Ok(Trailer)),
            (EndLf, b'\n') => Poll::Ready(Ok(End)),
            (EndLf, _) => invalid("invalid chunk end LF"),
            (Body | End, _) => Poll::Ready(Ok(self)),
        }
    }
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b + 10 - b'a',
        _ => b + 10 - b'A',
    }
}

/// Hands out up to `remaining_size` bytes of chunk data.
fn read_body(src: &mut BytesMut, remaining_size: &mut u64, buf: &mut Option<Bytes>) -> ChunkedState {
    if *remaining_size == 0 {
        return BodyCr;
    }

    let remaining = usize::try_from(*remaining_size).unwrap_or(usize::MAX);
    let read_size = std::cmp::min(remaining, src.len());
    if read_size == 0 {
        return Body;
    }

    *remaining_size -= read_size as u64;
    *buf = Some(src.split_to(read_size).freeze());

    if *remaining_size > 0 { Body } else { BodyCr }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(decoder: &mut ChunkedDecoder, buffer: &mut BytesMut) -> (Vec<u8>, bool) {
        let mut body = Vec::new();
        while let Some(item) = decoder.decode(buffer).unwrap() {
            match item {
                PayloadItem::Chunk(bytes) => body.extend_from_slice(&bytes),
                PayloadItem::Eof => return (body, true),
            }
        }
        (body, false)
    }

    #[test]
    fn test_html_in_chunks() {
        let mut buffer = BytesMut::from(&b"9\r\n<html><he\r\n1A\r\nad><title>t</title></head>\r\n0\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let (body, eof) = decode_all(&mut decoder, &mut buffer);
        assert!(eof);
        assert_eq!(body, b"<html><head><title>t</title></head>");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_extensions_and_trailers() {
        let mut buffer = BytesMut::from(&b"5;name=value\r\nhello\r\n0\r\nExpires: never\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();

        let (body, eof) = decode_all(&mut decoder, &mut buffer);
        assert!(eof);
        assert_eq!(body, b"hello");
    }

    #[test]
    fn test_partial_chunk_handed_out_early() {
        let mut buffer = BytesMut::from(&b"400\r\n<head></head>"[..]);
        let mut decoder = ChunkedDecoder::new();

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap(), &Bytes::from_static(b"<head></head>"));
        assert!(decoder.decode(&mut buffer).unwrap().is_none());
    }

    #[test]
    fn test_split_size_line() {
        let mut decoder = ChunkedDecoder::new();
        let mut buffer = BytesMut::from(&b"1"[..]);
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"0\r\n0123456789abcdef\r\n0\r\n\r\n");
        let (body, eof) = decode_all(&mut decoder, &mut buffer);
        assert!(eof);
        assert_eq!(body, b"0123456789abcdef");
    }

    #[test]
    fn test_invalid_size() {
        let mut buffer = BytesMut::from(&b"xyz\r\n"[..]);
        assert!(matches!(ChunkedDecoder::new().decode(&mut buffer), Err(ParseError::Io { .. })));
    }

    #[test]
    fn test_missing_crlf_after_data() {
        let mut buffer = BytesMut::from(&b"5\r\nhelloBad"[..]);
        let mut decoder = ChunkedDecoder::new();

        let chunk = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(chunk.as_bytes().unwrap(), &Bytes::from_static(b"hello"));
        assert!(decoder.decode(&mut buffer).is_err());
    }

    #[test]
    fn test_size_line_without_digits() {
        let mut buffer = BytesMut::from(&b"\r\n"[..]);
        assert!(matches!(ChunkedDecoder::new().decode(&mut buffer), Err(ParseError::Io { .. })));

        let mut buffer = BytesMut::from(&b"5\r\nhello\r\n\r\n"[..]);
        let mut decoder = ChunkedDecoder::new();
        assert_eq!(decoder.decode(&mut buffer).unwrap(), Some(PayloadItem::Chunk(Bytes::from_static(b"hello"))));
        assert!(decoder.decode(&mut buffer).is_err());

        let mut buffer = BytesMut::from(&b";ext\r\n"[..]);
        assert!(ChunkedDecoder::new().decode(&mut buffer).is_err());
    }

    #[test]
    fn test_size_overflow() {
        let mut buffer = BytesMut::from(&b"fffffffffffffffff\r\n"[..]);
        assert!(ChunkedDecoder::new().decode(&mut buffer).is_err());
    }

    #[test]
    fn test_zero_size_chunk() {
        let mut buffer = BytesMut::from(&b"0\r\n\r\n"[..]);
        let eof = ChunkedDecoder::new().decode(&mut buffer).unwrap().unwrap();
        assert!(eof.is_eof());
    }
}

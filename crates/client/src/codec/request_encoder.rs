use crate::codec::header::HeaderEncoder;
use crate::protocol::{RequestHead, SendError};
use bytes::BytesMut;
use http::Method;
use tokio_util::codec::Encoder;
use tracing::error;

/// Encoder for the single bodyless request a fetch sends.
///
/// Only `GET` and `HEAD` are accepted since no payload encoder exists on this side.
#[derive(Debug)]
pub struct RequestEncoder {
    header_encoder: HeaderEncoder,
}

impl RequestEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestEncoder {
    fn default() -> Self {
        Self { header_encoder: HeaderEncoder }
    }
}

impl Encoder<RequestHead> for RequestEncoder {
    type Error = SendError;

    fn encode(&mut self, head: RequestHead, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if !matches!(head.method(), &Method::GET | &Method::HEAD) {
            error!(method = %head.method(), "request with body is not supported");
            return Err(SendError::invalid_request(format!("unsupported method {}", head.method())));
        }

        self.header_encoder.encode(&head, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    #[test]
    fn get_request() {
        let head = Request::get("/").header(http::header::HOST, "example.com").body(()).unwrap();
        let mut dst = BytesMut::new();
        RequestEncoder::new().encode(head, &mut dst).unwrap();
        assert_eq!(&dst[..], &b"GET / HTTP/1.1\r\nhost: example.com\r\n\r\n"[..]);
    }

    #[test]
    fn reject_post() {
        let head = Request::post("/").body(()).unwrap();
        let mut dst = BytesMut::new();
        assert!(matches!(RequestEncoder::new().encode(head, &mut dst), Err(SendError::InvalidRequest { .. })));
        assert!(dst.is_empty());
    }
}

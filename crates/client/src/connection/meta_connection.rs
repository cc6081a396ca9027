use futures::{SinkExt, StreamExt};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info, trace, warn};

use micro_meta::protocol::{MetaError, MetaMap};
use micro_meta::session::StreamSession;

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::protocol::{Message, ParseError, PayloadItem, RequestHead};

/// A client connection that sends one request and feeds the response body into a
/// [`StreamSession`] until the session reaches a terminal state.
///
/// The connection is consumed by [`fetch`](MetaConnection::fetch). Returning early drops
/// both halves of the transport, so the rest of the document is never read.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
pub struct MetaConnection<R, W> {
    framed_read: FramedRead<R, ResponseDecoder>,
    framed_write: FramedWrite<W, RequestEncoder>,
}

impl<R, W> MetaConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, ResponseDecoder::new(), 8 * 1024),
            framed_write: FramedWrite::new(writer, RequestEncoder::new()),
        }
    }

    pub async fn fetch(mut self, request: RequestHead, mut session: StreamSession) -> Result<MetaMap, MetaError> {
        if let Err(e) = self.framed_write.send(request).await {
            error!(host = session.host(), path = session.path(), cause = %e, "can't send request");
            session.on_error(e);
            return session.into_result();
        }

        let mut header_received = false;

        while !session.is_terminal() {
            match self.framed_read.next().await {
                Some(Ok(Message::Header(header))) => {
                    let status = header.status();
                    debug!(host = session.host(), %status, version = ?header.version(), "received response header");
                    if status != StatusCode::OK {
                        warn!(host = session.host(), path = session.path(), %status, "unexpected response status");
                        session.reject(status.as_u16());
                    }
                    header_received = true;
                }

                Some(Ok(Message::Payload(_))) if !header_received => {
                    error!("receive body before response header");
                    session.on_error(ParseError::invalid_body("need header while receive body"));
                }

                Some(Ok(Message::Payload(PayloadItem::Chunk(bytes)))) => {
                    trace!(len = bytes.len(), "received body chunk");
                    session.on_chunk(bytes);
                }

                Some(Ok(Message::Payload(PayloadItem::Eof))) => {
                    trace!("response body finished");
                    session.on_end();
                }

                Some(Err(e)) => {
                    error!(host = session.host(), path = session.path(), cause = %e, "can't receive response");
                    session.on_error(e);
                }

                None => {
                    info!(host = session.host(), "connection closed by server");
                    session.on_end();
                }
            }
        }

        session.into_result()
    }
}

//! Per-fetch state driven by the transport's chunk, error and end signals.
//!
//! A [`StreamSession`] owns one [`HeadAccumulator`] and moves exactly once from
//! [`SessionState::Pending`] to a terminal state. The first terminal transition wins;
//! every later signal is ignored, so the transport may keep delivering chunks (or an
//! error, or the end of stream) after the head has been parsed without affecting the
//! result.

use std::error::Error;
use std::mem;

use tracing::{debug, trace, warn};

use crate::extract::parse_head;
use crate::protocol::{MetaError, MetaMap};
use crate::scan::{HeadAccumulator, ScanSignal};

/// Terminal state of a session, checked by the transport after each signal.
#[derive(Debug)]
pub enum SessionState {
    /// Still waiting for `</head>`, an error or the end of stream
    Pending,
    /// Head parsed successfully
    Done(MetaMap),
    /// Fetch failed; no mapping is produced
    Failed(MetaError),
}

impl SessionState {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending)
    }
}

#[derive(Debug)]
pub struct StreamSession {
    host: String,
    path: String,
    accumulator: HeadAccumulator,
    state: SessionState,
}

impl StreamSession {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self::with_accumulator(host, path, HeadAccumulator::new())
    }

    pub fn with_accumulator(host: impl Into<String>, path: impl Into<String>, accumulator: HeadAccumulator) -> Self {
        Self { host: host.into(), path: path.into(), accumulator, state: SessionState::Pending }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns true once the session is `Done` or `Failed`; no more input is needed
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !self.state.is_pending()
    }

    /// Handles the next chunk of the response body.
    pub fn on_chunk(&mut self, chunk: impl AsRef<[u8]>) {
        if self.is_terminal() {
            trace!(len = chunk.as_ref().len(), "session terminal, ignore chunk");
            return;
        }

        match self.accumulator.feed(chunk) {
            ScanSignal::Continue => {}
            ScanSignal::Complete(head) => {
                let meta_map = parse_head(&head);
                self.transition(SessionState::Done(meta_map));
            }
            ScanSignal::Abort => {
                let error = MetaError::head_too_large(self.accumulator.buffered_len(), self.accumulator.max_head_bytes());
                self.accumulator.discard();
                self.transition(SessionState::Failed(error));
            }
        }
    }

    /// Handles a transport failure; any partially buffered head is discarded.
    pub fn on_error<E: Into<Box<dyn Error + Send + Sync>>>(&mut self, cause: E) {
        if self.is_terminal() {
            trace!("session terminal, ignore error");
            return;
        }

        self.accumulator.discard();
        self.transition(SessionState::Failed(MetaError::transport(cause)));
    }

    /// Handles a non-success response status before any body was read.
    pub fn reject(&mut self, status: u16) {
        if self.is_terminal() {
            trace!(status, "session terminal, ignore status");
            return;
        }

        self.accumulator.discard();
        self.transition(SessionState::Failed(MetaError::bad_response(status)));
    }

    /// Handles the end of the stream.
    pub fn on_end(&mut self) {
        if self.is_terminal() {
            trace!("session terminal, ignore end of stream");
            return;
        }

        let state = match self.end_of_stream() {
            Ok(meta_map) => SessionState::Done(meta_map),
            Err(e) => SessionState::Failed(e),
        };
        self.transition(state);
    }

    /// Consumes the session into its outcome, treating a still pending session as ended.
    pub fn into_result(mut self) -> Result<MetaMap, MetaError> {
        match mem::replace(&mut self.state, SessionState::Pending) {
            SessionState::Done(meta_map) => Ok(meta_map),
            SessionState::Failed(e) => Err(e),
            SessionState::Pending => self.end_of_stream(),
        }
    }

    fn end_of_stream(&mut self) -> Result<MetaMap, MetaError> {
        if self.accumulator.is_empty() {
            return Err(MetaError::EmptyHead);
        }

        warn!(host = %self.host, path = %self.path, "stream ended before head close tag, parse partial head");
        let head = self.accumulator.take_head();
        Ok(parse_head(&head))
    }

    fn transition(&mut self, state: SessionState) {
        match &state {
            SessionState::Done(meta_map) => {
                debug!(host = %self.host, path = %self.path, meta_count = meta_map.len(), "session done");
            }
            SessionState::Failed(e) => {
                debug!(host = %self.host, path = %self.path, cause = %e, "session failed");
            }
            SessionState::Pending => {}
        }
        self.state = state;
    }
}

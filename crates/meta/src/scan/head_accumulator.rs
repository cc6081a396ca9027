//! Incremental detection of the `<head>` section in a chunked document stream.
//!
//! The transport delivers the document in chunks whose boundaries are not aligned with
//! any markup, so both markers may arrive split across two (or more) chunks. The
//! accumulator keeps just enough of the pre-head text to detect a split `<head>` marker,
//! buffers everything from that marker on, and stops as soon as `</head>` is complete.
//!
//! # Memory
//!
//! - Before `<head>`: at most `HEAD_OPEN_TAG.len() - 1` bytes are retained
//! - Inside the head: the head bytes only, bounded by `max_head_bytes`
//! - After `</head>`: nothing more is ever buffered

use std::cmp;

use bytes::{Buf, BytesMut};
use tracing::trace;

/// Marker that starts accumulation, matched case-sensitively
pub const HEAD_OPEN_TAG: &[u8] = b"<head>";

/// Marker that completes accumulation, matched case-sensitively
pub const HEAD_CLOSE_TAG: &[u8] = b"</head>";

/// Default limit on buffered head bytes before the scan is aborted
pub const DEFAULT_MAX_HEAD_BYTES: usize = 64 * 1024;

/// Outcome of feeding one chunk into a [`HeadAccumulator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanSignal {
    /// More chunks are needed, or the accumulator has already finished
    Continue,
    /// `</head>` was seen; carries the head text from `<head>` through `</head>`
    Complete(String),
    /// The head grew past the configured limit before `</head>` was seen
    Abort,
}

/// Stateful buffer that extracts the head section from a chunked stream.
///
/// # State Machine
///
/// - not started: searching for `<head>`, nothing accumulated
/// - started: accumulating, searching for `</head>`
/// - finished: every further [`feed`](HeadAccumulator::feed) is a no-op
#[derive(Debug)]
pub struct HeadAccumulator {
    /// head bytes from `<head>` onward
    buffer: BytesMut,
    /// tail of the pre-head text that may hold the start of a split `<head>`
    carry: BytesMut,
    /// number of buffer bytes already searched for `</head>`
    scanned: usize,
    started: bool,
    finished: bool,
    max_head_bytes: usize,
}

impl HeadAccumulator {
    pub fn new() -> Self {
        Self::with_max_head_bytes(DEFAULT_MAX_HEAD_BYTES)
    }

    pub fn with_max_head_bytes(max_head_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::new(),
            carry: BytesMut::with_capacity(HEAD_OPEN_TAG.len()),
            scanned: 0,
            started: false,
            finished: false,
            max_head_bytes,
        }
    }

    /// Feeds the next chunk of the document.
    ///
    /// # Returns
    ///
    /// - `ScanSignal::Complete(head)` exactly once, when `</head>` is seen
    /// - `ScanSignal::Abort` exactly once, if the head exceeds `max_head_bytes`
    /// - `ScanSignal::Continue` otherwise, including for every chunk fed after finishing
    pub fn feed(&mut self, chunk: impl AsRef<[u8]>) -> ScanSignal {
        if self.finished {
            trace!("head already finished, ignore chunk");
            return ScanSignal::Continue;
        }

        let chunk = chunk.as_ref();

        if self.started {
            self.buffer.extend_from_slice(chunk);
        } else {
            self.carry.extend_from_slice(chunk);
            match find(&self.carry, HEAD_OPEN_TAG) {
                Some(position) => {
                    trace!(position, "found head open tag");
                    self.carry.advance(position);
                    self.buffer = self.carry.split();
                    self.started = true;
                }
                None => {
                    // keep only what could still be the beginning of a split marker
                    let keep = cmp::min(self.carry.len(), HEAD_OPEN_TAG.len() - 1);
                    self.carry.advance(self.carry.len() - keep);
                    return ScanSignal::Continue;
                }
            }
        }

        let from = self.scanned.saturating_sub(HEAD_CLOSE_TAG.len() - 1);
        if let Some(position) = find(&self.buffer[from..], HEAD_CLOSE_TAG) {
            self.buffer.truncate(from + position + HEAD_CLOSE_TAG.len());
            self.finished = true;
            trace!(head_size = self.buffer.len(), "found head close tag");
            return ScanSignal::Complete(String::from_utf8_lossy(&self.buffer).into_owned());
        }
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_head_bytes {
            trace!(head_size = self.buffer.len(), max_head_bytes = self.max_head_bytes, "head too large, abort");
            self.finished = true;
            return ScanSignal::Abort;
        }

        trace!(head_size = self.buffer.len(), "need more head data");
        ScanSignal::Continue
    }

    /// Takes whatever head text has been accumulated so far and finishes the accumulator.
    pub fn take_head(&mut self) -> String {
        self.finished = true;
        let bytes = self.buffer.split();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Drops all buffered text and finishes the accumulator.
    pub fn discard(&mut self) {
        self.finished = true;
        self.buffer.clear();
        self.carry.clear();
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns true if no head bytes have been accumulated
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn max_head_bytes(&self) -> usize {
        self.max_head_bytes
    }
}

impl Default for HeadAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

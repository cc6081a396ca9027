use std::error::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("transport error: {source}")]
    Transport { source: Box<dyn Error + Send + Sync> },

    #[error("invalid response, status: {status}")]
    BadResponse { status: u16 },

    #[error("no head data received from server")]
    EmptyHead,

    #[error("head size too large, current: {current_size} exceed the limit {max_size}")]
    HeadTooLarge { current_size: usize, max_size: usize },
}

impl MetaError {
    pub fn transport<E: Into<Box<dyn Error + Send + Sync>>>(e: E) -> Self {
        Self::Transport { source: e.into() }
    }

    pub fn bad_response(status: u16) -> Self {
        Self::BadResponse { status }
    }

    pub fn head_too_large(current_size: usize, max_size: usize) -> Self {
        Self::HeadTooLarge { current_size, max_size }
    }

    /// Returns true if the failure came from the transport rather than the document
    #[inline]
    pub fn is_transport(&self) -> bool {
        matches!(self, MetaError::Transport { .. })
    }

    /// Returns true if the document never delivered any head content
    #[inline]
    pub fn is_empty_head(&self) -> bool {
        matches!(self, MetaError::EmptyHead)
    }
}

mod stream_session;

pub use stream_session::{SessionState, StreamSession};

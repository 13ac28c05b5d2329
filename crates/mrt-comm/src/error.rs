//! Messaging-layer errors.
//!
//! Any of these is fatal to the simulation: the protocol is lock-step and a
//! rank that cannot communicate cannot make progress; there is no recovery
//! path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommError {
    #[error("peer rank disconnected")]
    Disconnected,

    #[error("no matching message within {0} s; a peer stalled or exited")]
    Stalled(u64),

    #[error("malformed message: {0}")]
    Protocol(String),

    #[error("tag {0} is reserved for collective framing")]
    ReservedTag(u32),
}

pub type CommResult<T> = Result<T, CommError>;

//! `mrt-comm` — rank-to-rank messaging for the `rust_mrt` simulator.
//!
//! The tick engine talks to its peers exclusively through the
//! [`Communicator`] trait: broadcast, all-reduce, barrier, tagged
//! point-to-point train messages, and two variable-length gathers for
//! snapshot collection.  Those are the engine's only blocking points.
//!
//! [`LocalCluster`] is the in-process implementation: one endpoint per rank
//! over unbounded channels, with collectives built as root-coordinated
//! rounds on reserved tags.  A transport backed by a real message-passing
//! runtime can be substituted without touching the engine.
//!
//! # Tag space
//!
//! Application tags are station ids.  The topmost eight `u32` values are
//! reserved for collective framing; sending on one of them is a
//! [`CommError::ReservedTag`].

pub mod comm;
pub mod error;
pub mod local;
pub mod wire;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use comm::{Communicator, MAX_APP_TAG};
pub use error::{CommError, CommResult};
pub use local::{LocalCluster, LocalComm};
pub use wire::{LinkMsg, TrainDescriptor};

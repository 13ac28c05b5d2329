//! `mrt-net` — transit topology for the `rust_mrt` simulator.
//!
//! A [`TransitNetwork`] is the validated, immutable description of the whole
//! system: the station table (names + popularities), the tick-distance
//! adjacency matrix, and the three line routes.  It is built once at startup
//! via [`TransitNetworkBuilder`] and shared read-only by every rank.
//!
//! [`Partition`] maps stations to ranks; it is a pure function of the station
//! id and the process count, so every rank computes the same ownership map
//! without communicating.

pub mod error;
pub mod network;
pub mod partition;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{NetError, NetResult};
pub use network::{TransitNetwork, TransitNetworkBuilder};
pub use partition::Partition;

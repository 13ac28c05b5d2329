//! `mrt-sim` — the distributed tick engine of the `rust_mrt` simulator.
//!
//! # Tick protocol
//!
//! ```text
//! for tick in 0..total_ticks:
//!   ⓪ Broadcast — rank 0 announces the tick number.
//!   ① Spawn     — while trains remain unspawned, terminals create them;
//!                 one all-reduce per line keeps the global id sequence
//!                 identical on every rank.
//!   ── barrier ──
//!   ② Dispatch  — every platform, in insertion order: depart (send the
//!                 train triple, or the sentinel, to the destination's
//!                 owner), then promote loader → traveller.
//!   ③ Receive   — every station receives exactly incoming_degree(s)
//!                 messages, admits arrivals (turn-around at terminals),
//!                 then each platform admits its next loader.
//!   ── barrier ──
//!   ④ Snapshot  — on the last print_last ticks: gather every rank's
//!                 tokens to rank 0, sort lexicographically, print.
//! ```
//!
//! All cross-rank traffic goes through `mrt_comm::Communicator`; everything
//! inside a rank is single-threaded and deterministic, so identical inputs
//! produce byte-identical output at any rank count.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mrt_core::PopularityLoadGen;
//! use mrt_sim::{run_local, SimParams};
//!
//! let params = SimParams { total_ticks: 10, print_last: 2, trains_per_line: [4, 0, 0] };
//! let stdout = run_local(&network, &params, 4, |src, dst, pop| {
//!     PopularityLoadGen::new(src, dst, pop)
//! })?;
//! ```

pub mod engine;
pub mod error;
pub mod observer;
pub mod platform;
pub mod queue;
pub mod runner;
pub mod snapshot;
pub mod spawn;
pub mod station;
pub mod train;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::{Engine, SimParams};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, TickObserver};
pub use queue::HoldingQueue;
pub use runner::run_local;
pub use station::Station;
pub use train::{Train, TrainStatus};

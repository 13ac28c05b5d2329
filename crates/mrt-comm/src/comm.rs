//! The `Communicator` trait — the engine's only window onto other ranks.
//!
//! The surface is deliberately the six call shapes the tick protocol needs
//! and nothing more: one broadcast, one all-reduce, one barrier, tagged
//! point-to-point with any-source receive, and two variable-length gathers.
//! Keeping the seam this narrow is what lets the whole engine run unchanged
//! over an in-process cluster or a real message-passing runtime.

use crate::error::CommResult;
use crate::wire::LinkMsg;

/// Highest tag available to application messages; everything above is
/// reserved for collective framing by transport implementations.
pub const MAX_APP_TAG: u32 = u32::MAX - 8;

/// A single rank's endpoint into the communicator group.
///
/// All collective methods must be called by **every** rank of the group in
/// the same order; the transport may deadlock otherwise (the simulation is
/// lock-step and treats desynchronization as fatal).
pub trait Communicator: Send {
    /// This endpoint's rank, in `0..size()`.
    fn rank(&self) -> usize;

    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// Block until every rank has entered the barrier.
    fn barrier(&mut self) -> CommResult<()>;

    /// `root`'s value, delivered to every rank.
    fn broadcast_u64(&mut self, root: usize, value: u64) -> CommResult<u64>;

    /// Sum of every rank's `value`, delivered to every rank.
    fn allreduce_sum(&mut self, value: u64) -> CommResult<u64>;

    /// Post `msg` to rank `dst` under `tag` (≤ [`MAX_APP_TAG`]).
    ///
    /// Non-blocking: the payload is buffered by the transport and the call
    /// returns immediately.  Delivery order is FIFO per (sender, tag).
    fn send(&mut self, dst: usize, tag: u32, msg: LinkMsg) -> CommResult<()>;

    /// Receive the next message carrying `tag` from **any** source,
    /// blocking until one arrives.
    fn recv_any(&mut self, tag: u32) -> CommResult<LinkMsg>;

    /// Gather each rank's byte buffer to `root`.
    ///
    /// Returns `Some(buffers)` (indexed by rank) at the root, `None`
    /// elsewhere.
    fn gather_bytes(&mut self, root: usize, data: &[u8]) -> CommResult<Option<Vec<Vec<u8>>>>;

    /// Gather each rank's `u32` vector to `root`; same shape as
    /// [`gather_bytes`](Self::gather_bytes).
    fn gather_u32s(&mut self, root: usize, data: &[u32]) -> CommResult<Option<Vec<Vec<u32>>>>;
}

//! Station → rank ownership map.
//!
//! The map must be identical on every rank and stable across ticks, so it is
//! a pure function of the station id and the rank count: `id mod procs`.
//! Every rank derives the same ownership without a byte of communication.

use mrt_core::StationId;

/// Deterministic station partitioner.
#[derive(Copy, Clone, Debug)]
pub struct Partition {
    procs: usize,
}

impl Partition {
    /// # Panics
    /// Panics if `procs` is 0.
    pub fn new(procs: usize) -> Self {
        assert!(procs > 0, "partition needs at least one rank");
        Partition { procs }
    }

    pub fn procs(&self) -> usize {
        self.procs
    }

    /// The rank that owns `station`.
    #[inline]
    pub fn rank_of(&self, station: StationId) -> usize {
        station.index() % self.procs
    }

    /// All stations owned by `rank`, ascending id order.
    ///
    /// Ranks beyond the station count own nothing; they still take part in
    /// every collective.
    pub fn owned(&self, rank: usize, station_count: usize) -> Vec<StationId> {
        (rank..station_count)
            .step_by(self.procs)
            .map(|i| StationId(i as u32))
            .collect()
    }
}

//! Simulation time.
//!
//! The whole network advances in lock step, one `Tick` per round of the
//! phase protocol, and every duration in the system (load time, link
//! distance) is an integer number of ticks.  An integral counter keeps
//! deadline arithmetic exact, and a plain `Ord` comparison against a
//! precomputed deadline is the only time test the platform state machine
//! ever performs — there is no clock, no wall time, and no subtraction.

use std::fmt;

/// An absolute simulation tick.
///
/// A `u64` counter outlives any conceivable run; ticks are never reused and
/// never go backwards, so deadlines computed from a past tick are always
/// comparable to the current one.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick at which work starting now and lasting `duration` ticks is
    /// complete.
    ///
    /// This is how platforms derive `load_deadline` and `travel_deadline`;
    /// the work counts as done at any tick `t >= deadline`, so a duration
    /// of 1 started at tick `n` finishes at tick `n + 1`, never at `n`.
    #[inline]
    pub fn deadline(self, duration: u64) -> Tick {
        Tick(self.0 + duration)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

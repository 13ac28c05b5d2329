//! Tick observer trait for progress reporting.

use mrt_core::Tick;

/// Callbacks invoked by [`Engine::run`][crate::Engine::run] at tick
/// boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers run on the engine's rank;
/// anything written to stdout would corrupt the snapshot stream, so progress
/// printers should target stderr.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress { every: u64 }
///
/// impl TickObserver for Progress {
///     fn on_tick_end(&mut self, tick: Tick, spawned: u64) {
///         if tick.0 % self.every == 0 {
///             eprintln!("tick {tick}: {spawned} trains live");
///         }
///     }
/// }
/// ```
pub trait TickObserver {
    /// Called at the very start of each tick, before the spawn phase.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the tick's final barrier (and snapshot, if any).
    ///
    /// `spawned` is the global number of trains created so far.
    fn on_tick_end(&mut self, _tick: Tick, _spawned: u64) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`TickObserver`] that does nothing.
pub struct NoopObserver;

impl TickObserver for NoopObserver {}

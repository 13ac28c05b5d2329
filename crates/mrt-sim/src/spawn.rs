//! Spawning policy: terminal budgets and the global id sequence.
//!
//! For a line with `N` trains, ⌈N/2⌉ spawn at the forward-terminal heading
//! forward and ⌊N/2⌋ at the backward-terminal heading backward.  Each tick,
//! each line spawns at most one train per terminal while budget remains;
//! the forward-terminal takes the even offset from the shared id counter
//! and the backward-terminal the odd one.
//!
//! The counter is global but never shared: every rank keeps a shadow copy
//! and advances it by the all-reduced per-line spawn count, so ids come out
//! identical everywhere without a coordinator.  The forward budget (the
//! larger half) can never run out before the backward one, which keeps the
//! id sequence dense.

use mrt_comm::Communicator;
use mrt_core::{Direction, LineColor, LoadTimeGen, StationId, Tick, TrainId};
use mrt_net::TransitNetwork;

use crate::error::{SimError, SimResult};
use crate::station::Station;

/// Per-line terminal budgets plus the shadowed global spawn counter.
pub struct Spawner {
    total:   u64,
    spawned: u64,

    forward_terminal:  [Option<StationId>; 3],
    backward_terminal: [Option<StationId>; 3],
    forward_budget:    [u32; 3],
    backward_budget:   [u32; 3],
}

impl Spawner {
    pub fn new(net: &TransitNetwork, trains_per_line: [u32; 3]) -> SimResult<Spawner> {
        let mut spawner = Spawner {
            total:             trains_per_line.iter().map(|&n| n as u64).sum(),
            spawned:           0,
            forward_terminal:  [None; 3],
            backward_terminal: [None; 3],
            forward_budget:    [0; 3],
            backward_budget:   [0; 3],
        };
        for line in LineColor::ALL {
            let n = trains_per_line[line.index()];
            match net.terminals(line) {
                Some((fwd, bwd)) => {
                    spawner.forward_terminal[line.index()] = Some(fwd);
                    spawner.backward_terminal[line.index()] = Some(bwd);
                    spawner.backward_budget[line.index()] = n / 2;
                    spawner.forward_budget[line.index()] = n - n / 2;
                }
                None if n > 0 => {
                    return Err(SimError::Config(format!(
                        "{n} trains requested for the {line} line, which has no route"
                    )));
                }
                None => {}
            }
        }
        Ok(spawner)
    }

    /// Global number of trains spawned so far (identical on every rank).
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn done(&self) -> bool {
        self.spawned >= self.total
    }

    /// One spawn step: every rank spawns at the terminals it owns, then the
    /// per-line all-reduce advances the shared counter.
    ///
    /// Must be called by every rank each tick until [`done`](Self::done);
    /// the all-reduce sequence is part of the lock-step protocol.
    pub fn step<C, G>(
        &mut self,
        now:      Tick,
        stations: &mut [Station<G>],
        comm:     &mut C,
    ) -> SimResult<()>
    where
        C: Communicator,
        G: LoadTimeGen,
    {
        if self.done() {
            return Ok(());
        }
        for line in LineColor::ALL {
            let i = line.index();
            let base = self.spawned;
            let mut local = 0u64;
            for station in stations.iter_mut() {
                if self.forward_terminal[i] == Some(station.id) && self.forward_budget[i] > 0 {
                    station.spawn(line, TrainId(base as u32), Direction::Forward, now)?;
                    self.forward_budget[i] -= 1;
                    local += 1;
                }
                if self.backward_terminal[i] == Some(station.id) && self.backward_budget[i] > 0 {
                    station.spawn(line, TrainId(base as u32 + 1), Direction::Backward, now)?;
                    self.backward_budget[i] -= 1;
                    local += 1;
                }
            }
            self.spawned += comm.allreduce_sum(local)?;
        }
        Ok(())
    }
}

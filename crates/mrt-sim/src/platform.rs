//! Platform state machine: the outgoing-edge endpoint at a station.
//!
//! A platform owns one holding queue, one loader slot, and one traveller
//! slot.  Loader and traveller are independent — a train can be boarding
//! while the previously dispatched one is still on the link — but each slot
//! holds at most one train.
//!
//! The three transitions run in a fixed order within a tick, all evaluated
//! against the current tick `t`:
//!
//! 1. **depart**  — traveller done (`t ≥ travel_deadline`) leaves for the
//!    destination station.
//! 2. **promote** — if the traveller slot is free and the loader is done
//!    (`t ≥ load_deadline`), the loader becomes the traveller with
//!    `travel_deadline = t + distance`.  A departure in step 1 frees the
//!    slot for the same tick's promote.
//! 3. **admit_load** — if the loader slot is free, board the next eligible
//!    train from the holding queue for `oracle(train)` ticks.
//!
//! Because deadlines are compared against `t` and set from `t`, a train
//! never clears two transitions in one tick: promoted at `t`, it departs at
//! `t + distance` at the earliest.

use rustc_hash::FxHashMap;

use mrt_core::{LoadTimeGen, StationId, Tick, TrainId};

use crate::error::{SimError, SimResult};
use crate::queue::HoldingQueue;
use crate::train::{Train, TrainStatus};

/// One directed outgoing link and its boarding machinery.
///
/// Shared by every line that traverses `src → dst` in either direction; the
/// station keys its platforms by `dst` alone.
pub struct Platform<G> {
    /// Destination station; also the message tag for departures.
    pub dst:      StationId,
    /// Link travel time in ticks (≥ 1, from the adjacency matrix).
    pub distance: u64,

    r#gen:           G,
    queue:           HoldingQueue,
    loading:         Option<TrainId>,
    load_deadline:   Tick,
    travelling:      Option<Train>,
    travel_deadline: Tick,
}

impl<G: LoadTimeGen> Platform<G> {
    pub fn new(dst: StationId, distance: u64, r#gen: G) -> Self {
        Platform {
            dst,
            distance,
            r#gen,
            queue:           HoldingQueue::new(),
            loading:         None,
            load_deadline:   Tick::ZERO,
            travelling:      None,
            travel_deadline: Tick::ZERO,
        }
    }

    /// Push a holding train into the boarding queue.
    pub fn enqueue(&mut self, arrival: Tick, train: TrainId) {
        self.queue.push(arrival, train);
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Transition 1: release the traveller if its journey completes by `now`.
    pub fn depart(&mut self, now: Tick) -> Option<Train> {
        if self.travelling.is_some() && now >= self.travel_deadline {
            self.travelling.take()
        } else {
            None
        }
    }

    /// Transition 2: move a finished loader into the (free) traveller slot.
    ///
    /// The loader's `Train` is taken out of `trains` — a travelling train is
    /// owned by the link, not the station.
    pub fn promote(
        &mut self,
        now:    Tick,
        trains: &mut FxHashMap<TrainId, Train>,
    ) -> SimResult<()> {
        if self.travelling.is_some() {
            return Ok(());
        }
        let Some(id) = self.loading else { return Ok(()) };
        if now < self.load_deadline {
            return Ok(());
        }
        let mut train = trains.remove(&id).ok_or(SimError::LostTrain(id))?;
        train.status = TrainStatus::Travelling;
        self.loading = None;
        self.travelling = Some(train);
        self.travel_deadline = now.deadline(self.distance);
        Ok(())
    }

    /// Transition 3: board the next eligible train from the holding queue.
    pub fn admit_load(
        &mut self,
        now:    Tick,
        trains: &mut FxHashMap<TrainId, Train>,
    ) -> SimResult<()> {
        if self.loading.is_some() {
            return Ok(());
        }
        let Some(id) = self.queue.pop_ready(now) else { return Ok(()) };
        let train = trains.get_mut(&id).ok_or(SimError::LostTrain(id))?;
        let wait = self.r#gen.next_load_time(id);
        if wait == 0 {
            return Err(SimError::BadLoadTime(id));
        }
        train.status = TrainStatus::Loading;
        self.loading = Some(id);
        self.load_deadline = now.deadline(wait);
        Ok(())
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// The train currently on the link, if any.
    pub fn travelling(&self) -> Option<&Train> {
        self.travelling.as_ref()
    }

    /// The train currently boarding, if any.
    pub fn loading(&self) -> Option<TrainId> {
        self.loading
    }

    pub fn queue(&self) -> &HoldingQueue {
        &self.queue
    }
}

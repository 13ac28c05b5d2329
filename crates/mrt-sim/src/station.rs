//! Station: platform arena, per-line routing tables, and train custody.
//!
//! A station owns one platform per distinct outgoing edge, created in the
//! canonical order (lines in declaration order, forward traversal before
//! backward) and iterated in that creation order ever after — the dispatch
//! loop relies on it to pair sends with receives.  Two lines crossing the
//! same edge share one platform and therefore one holding queue.
//!
//! `trains` holds every train currently holding or loading here; a
//! travelling train belongs to its platform's traveller slot instead, so
//! the two collections partition the local fleet.

use rustc_hash::FxHashMap;

use mrt_core::{Direction, LineColor, LoadTimeGen, StationId, Tick, TrainId};
use mrt_net::TransitNetwork;

use crate::error::{SimError, SimResult};
use crate::platform::Platform;
use crate::train::Train;

/// One station and everything it owns.
pub struct Station<G> {
    pub id:   StationId,
    pub name: String,

    /// Platforms in creation order.
    platforms: Vec<Platform<G>>,
    /// Destination station → index into `platforms`.
    by_dst: FxHashMap<StationId, usize>,
    /// Per line: platform a forward train boards next, if the line runs here.
    forward: [Option<usize>; 3],
    /// Per line: platform a backward train boards next.
    backward: [Option<usize>; 3],

    /// Trains currently holding or loading at any of this station's
    /// platforms, keyed by id.
    trains: FxHashMap<TrainId, Train>,
}

impl<G: LoadTimeGen> Station<G> {
    /// Build the station `id` from the network description.
    ///
    /// `make_gen` constructs the load-time oracle for each platform from
    /// `(src, dst, popularity of src)`.
    pub fn build<F>(net: &TransitNetwork, id: StationId, make_gen: &F) -> Station<G>
    where
        F: Fn(StationId, StationId, u64) -> G,
    {
        let mut station = Station {
            id,
            name: net.name(id).to_owned(),
            platforms: Vec::new(),
            by_dst: FxHashMap::default(),
            forward: [None; 3],
            backward: [None; 3],
            trains: FxHashMap::default(),
        };

        for (line, direction, dst) in net.outgoing_moves(id) {
            let idx = match station.by_dst.get(&dst) {
                Some(&idx) => idx,
                None => {
                    let idx = station.platforms.len();
                    station.platforms.push(Platform::new(
                        dst,
                        net.distance(id, dst),
                        make_gen(id, dst, net.popularity(id)),
                    ));
                    station.by_dst.insert(dst, idx);
                    idx
                }
            };
            match direction {
                Direction::Forward  => station.forward[line.index()] = Some(idx),
                Direction::Backward => station.backward[line.index()] = Some(idx),
            }
        }

        station
    }

    // ── Train intake ──────────────────────────────────────────────────────

    /// Create a fresh train here (terminal spawn).  The direction is taken
    /// as given.
    pub fn spawn(
        &mut self,
        line:      LineColor,
        id:        TrainId,
        direction: Direction,
        now:       Tick,
    ) -> SimResult<()> {
        self.accept(Train::new(line, id, direction, now))
    }

    /// Admit a train arriving off a link.  The turn-around rule is the
    /// network's ([`TransitNetwork::turnaround`]): a train reaching its
    /// line's far terminal flips direction, anywhere else it keeps going.
    pub fn admit(
        &mut self,
        net:       &TransitNetwork,
        line:      LineColor,
        id:        TrainId,
        direction: Direction,
        now:       Tick,
    ) -> SimResult<()> {
        let direction = net.turnaround(line, self.id, direction);
        self.accept(Train::new(line, id, direction, now))
    }

    fn accept(&mut self, train: Train) -> SimResult<()> {
        let slot = match train.direction {
            Direction::Forward  => self.forward[train.line.index()],
            Direction::Backward => self.backward[train.line.index()],
        };
        let idx = slot.ok_or(SimError::LostTrain(train.id))?;
        self.platforms[idx].enqueue(train.arrival_tick, train.id);
        self.trains.insert(train.id, train);
        Ok(())
    }

    // ── Per-tick platform driving ─────────────────────────────────────────

    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    /// Destination of the platform at `idx` (creation order).
    pub fn dst_of(&self, idx: usize) -> StationId {
        self.platforms[idx].dst
    }

    /// Run the depart transition on platform `idx`.
    pub fn depart(&mut self, idx: usize, now: Tick) -> Option<Train> {
        self.platforms[idx].depart(now)
    }

    /// Run the promote transition on platform `idx`.
    pub fn promote(&mut self, idx: usize, now: Tick) -> SimResult<()> {
        let Station { platforms, trains, .. } = self;
        platforms[idx].promote(now, trains)
    }

    /// Run the admit-load transition on every platform, in creation order.
    pub fn load_all(&mut self, now: Tick) -> SimResult<()> {
        let Station { platforms, trains, .. } = self;
        for platform in platforms.iter_mut() {
            platform.admit_load(now, trains)?;
        }
        Ok(())
    }

    // ── Snapshot access ───────────────────────────────────────────────────

    /// Trains holding or loading here, in unspecified order (the snapshot
    /// sort is global).
    pub fn held_trains(&self) -> impl Iterator<Item = &Train> {
        self.trains.values()
    }

    /// Platforms in creation order.
    pub fn platforms(&self) -> impl Iterator<Item = &Platform<G>> {
        self.platforms.iter()
    }

    /// Number of trains holding or loading here.
    pub fn held_count(&self) -> usize {
        self.trains.len()
    }
}

//! Train identity and per-tick state.

use mrt_core::{Direction, LineColor, Tick, TrainId};

/// What a train is doing right now.  Drives the snapshot token suffix:
/// `#` holding, `%` loading, `->dst` travelling.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TrainStatus {
    /// Waiting in a platform's holding queue.
    Holding,
    /// Boarding at a platform, until `load_deadline`.
    Loading,
    /// In transit on a link, until `travel_deadline`.
    Travelling,
}

/// One train.  Identity is `(line, id)`; everything else is mutable state.
///
/// A train lives in exactly one place: its holding station's train map
/// while `Holding`/`Loading`, or the link's traveller slot while
/// `Travelling`.  Crossing a rank boundary reduces it to a
/// `(line, id, direction)` triple; the admitting station rebuilds the rest.
#[derive(Clone, Debug)]
pub struct Train {
    pub line:         LineColor,
    pub id:           TrainId,
    pub direction:    Direction,
    /// Tick at which the train last entered a holding queue; the primary
    /// boarding-priority key.
    pub arrival_tick: Tick,
    pub status:       TrainStatus,
}

impl Train {
    /// A freshly spawned or admitted train: holding, just arrived.
    pub fn new(line: LineColor, id: TrainId, direction: Direction, arrival: Tick) -> Train {
        Train {
            line,
            id,
            direction,
            arrival_tick: arrival,
            status: TrainStatus::Holding,
        }
    }
}

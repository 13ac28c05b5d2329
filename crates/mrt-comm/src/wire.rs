//! On-wire format for trains crossing rank boundaries.
//!
//! A train moves between ranks as a bare `(line, id, direction)` triple of
//! `i32`s and is re-materialized at the destination.  The all-minus-one
//! triple is the "nothing departed" sentinel: every platform sends exactly
//! one triple per tick so the receiver can size its receive loop by edge
//! count alone.

use mrt_core::{Direction, LineColor, TrainId};

use crate::error::{CommError, CommResult};

/// Wire encoding of `Direction`: forward = 1, backward = -1.
const DIR_FORWARD: i32 = 1;
const DIR_BACKWARD: i32 = -1;

// ── TrainDescriptor ───────────────────────────────────────────────────────────

/// The cross-rank identity of a moving train.  Mutable state
/// (`arrival_tick`, status) is reconstructed by the admitting station.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TrainDescriptor {
    pub line:      LineColor,
    pub id:        TrainId,
    pub direction: Direction,
}

// ── LinkMsg ───────────────────────────────────────────────────────────────────

/// One platform's per-tick message to its destination station: either a
/// departing train or the sentinel.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LinkMsg {
    Train(TrainDescriptor),
    Empty,
}

impl LinkMsg {
    /// Encode to the `i32` triple.
    pub fn to_wire(self) -> [i32; 3] {
        match self {
            LinkMsg::Empty => [-1, -1, -1],
            LinkMsg::Train(t) => {
                let dir = match t.direction {
                    Direction::Forward  => DIR_FORWARD,
                    Direction::Backward => DIR_BACKWARD,
                };
                [t.line.index() as i32, t.id.0 as i32, dir]
            }
        }
    }

    /// Decode a received triple, rejecting anything a conforming sender
    /// could not have produced.
    pub fn from_wire(raw: [i32; 3]) -> CommResult<LinkMsg> {
        if raw[0] == -1 {
            return Ok(LinkMsg::Empty);
        }
        let line = usize::try_from(raw[0])
            .ok()
            .and_then(LineColor::from_index)
            .ok_or_else(|| CommError::Protocol(format!("bad line index {}", raw[0])))?;
        let id = u32::try_from(raw[1])
            .map(TrainId)
            .map_err(|_| CommError::Protocol(format!("bad train id {}", raw[1])))?;
        let direction = match raw[2] {
            DIR_FORWARD  => Direction::Forward,
            DIR_BACKWARD => Direction::Backward,
            other => return Err(CommError::Protocol(format!("bad direction {other}"))),
        };
        Ok(LinkMsg::Train(TrainDescriptor { line, id, direction }))
    }
}

//! `HoldingQueue` — boarding-priority queue for one platform.
//!
//! # Ordering
//!
//! Trains board in ascending `(arrival_tick, id)` order: earlier arrivals
//! first (fairness), ties broken by the globally unique train id
//! (determinism).  The key is a total order, so every conforming heap
//! implementation pops the same sequence — behavior cannot depend on
//! insertion order or on which rank runs the queue.
//!
//! # Boarding eligibility
//!
//! A train that entered the queue at tick `t` may board at tick `t + 1` at
//! the earliest; [`pop_ready`](HoldingQueue::pop_ready) enforces this by
//! popping only when the head arrived strictly before the current tick.
//! Since the head carries the minimum arrival tick, gating the head gates
//! the whole queue.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use mrt_core::{Tick, TrainId};

/// Priority queue over trains waiting to board one platform.
#[derive(Default)]
pub struct HoldingQueue {
    heap: BinaryHeap<Reverse<(Tick, TrainId)>>,
}

impl HoldingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `train`, which entered holding at `arrival`.
    pub fn push(&mut self, arrival: Tick, train: TrainId) {
        self.heap.push(Reverse((arrival, train)));
    }

    /// Remove and return the highest-priority train, provided it arrived
    /// strictly before `now`.  Returns `None` if the queue is empty or every
    /// waiting train arrived this very tick.
    pub fn pop_ready(&mut self, now: Tick) -> Option<TrainId> {
        let Reverse((arrival, _)) = *self.heap.peek()?;
        if arrival >= now {
            return None;
        }
        self.heap.pop().map(|Reverse((_, train))| train)
    }

    /// The `(arrival_tick, id)` key that would board next, regardless of
    /// eligibility.
    pub fn peek(&self) -> Option<(Tick, TrainId)> {
        self.heap.peek().map(|&Reverse(key)| key)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

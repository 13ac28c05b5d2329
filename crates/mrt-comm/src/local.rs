//! In-process transport: one endpoint per rank over unbounded channels.
//!
//! # Design
//!
//! Every rank owns one inbox (`mpsc::Receiver`) and a sender handle to every
//! peer's inbox, itself included (a station may dispatch to another station
//! on its own rank).  Sends move the payload into the destination inbox and
//! return immediately, so the fire-and-forget dispatch pattern is safe: a
//! buffered message cannot be overtaken, overwritten, or dropped.
//!
//! Tag matching uses a pending stash: an inbox message that does not match
//! the tag (and, for collectives, the source) currently being waited on is
//! parked and re-examined first on later receives.  Channel order is FIFO
//! per sender, and the stash is scanned front-to-back, so per-(source, tag)
//! ordering is preserved — which is all the lock-step protocol needs.
//!
//! # Collectives
//!
//! Barrier, broadcast, all-reduce, and the gathers are root-coordinated
//! rounds over reserved tags (rank 0 coordinates the rank-less ones).  They
//! are correct for any interleaving because every rank issues the same
//! global sequence of collective calls, and contributions are consumed from
//! specific sources in rank order.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::comm::{Communicator, MAX_APP_TAG};
use crate::error::{CommError, CommResult};
use crate::wire::LinkMsg;

// ── Reserved collective tags ──────────────────────────────────────────────────

const TAG_BARRIER_ARRIVE: u32 = u32::MAX;
const TAG_BARRIER_RELEASE: u32 = u32::MAX - 1;
const TAG_BCAST: u32 = u32::MAX - 2;
const TAG_REDUCE_PART: u32 = u32::MAX - 3;
const TAG_REDUCE_SUM: u32 = u32::MAX - 4;
const TAG_GATHER_BYTES: u32 = u32::MAX - 5;
const TAG_GATHER_LENS: u32 = u32::MAX - 6;

/// Longest a receive will wait for the next inbox message before deciding a
/// peer is gone.
const RECV_TIMEOUT: Duration = Duration::from_secs(30);

// ── Envelope ──────────────────────────────────────────────────────────────────

enum Body {
    Link([i32; 3]),
    Word(u64),
    Bytes(Vec<u8>),
    Words(Vec<u32>),
    Token,
}

struct Envelope {
    src:  usize,
    tag:  u32,
    body: Body,
}

// ── LocalCluster ──────────────────────────────────────────────────────────────

/// Factory for a group of connected [`LocalComm`] endpoints.
pub struct LocalCluster;

impl LocalCluster {
    /// Create `size` endpoints, indexed by rank.  Move each into its own
    /// thread; the group is wired all-to-all.
    ///
    /// # Panics
    /// Panics if `size` is 0.
    pub fn new(size: usize) -> Vec<LocalComm> {
        assert!(size > 0, "a cluster needs at least one rank");
        let mut senders = Vec::with_capacity(size);
        let mut inboxes = Vec::with_capacity(size);
        for _ in 0..size {
            let (tx, rx) = mpsc::channel();
            senders.push(tx);
            inboxes.push(rx);
        }
        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| LocalComm {
                rank,
                peers: senders.clone(),
                inbox,
                stash: VecDeque::new(),
            })
            .collect()
    }
}

// ── LocalComm ─────────────────────────────────────────────────────────────────

/// One rank's endpoint of an in-process cluster.
pub struct LocalComm {
    rank:  usize,
    peers: Vec<Sender<Envelope>>,
    inbox: Receiver<Envelope>,
    stash: VecDeque<Envelope>,
}

impl LocalComm {
    fn post(&self, dst: usize, tag: u32, body: Body) -> CommResult<()> {
        let env = Envelope { src: self.rank, tag, body };
        self.peers[dst].send(env).map_err(|_| CommError::Disconnected)
    }

    /// Blocking receive of the next envelope matching `tag` (and `src`, if
    /// given).  Non-matching envelopes are stashed in arrival order.
    ///
    /// Waits at most [`RECV_TIMEOUT`] for each inbox message: in a correct
    /// lock-step run nothing blocks for long, so a long silence means a
    /// peer stalled or died and hanging forever would mask it.
    fn take(&mut self, src: Option<usize>, tag: u32) -> CommResult<Envelope> {
        let matches =
            |e: &Envelope| e.tag == tag && src.map_or(true, |s| e.src == s);
        if let Some(pos) = self.stash.iter().position(matches) {
            return Ok(self.stash.remove(pos).expect("position just found"));
        }
        loop {
            let env = match self.inbox.recv_timeout(RECV_TIMEOUT) {
                Ok(env) => env,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(CommError::Stalled(RECV_TIMEOUT.as_secs()));
                }
                Err(RecvTimeoutError::Disconnected) => return Err(CommError::Disconnected),
            };
            if matches(&env) {
                return Ok(env);
            }
            self.stash.push_back(env);
        }
    }

    fn take_word(&mut self, src: usize, tag: u32) -> CommResult<u64> {
        match self.take(Some(src), tag)?.body {
            Body::Word(w) => Ok(w),
            _ => Err(CommError::Protocol("expected word body".into())),
        }
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn barrier(&mut self) -> CommResult<()> {
        let size = self.size();
        if size == 1 {
            return Ok(());
        }
        if self.rank == 0 {
            for r in 1..size {
                self.take(Some(r), TAG_BARRIER_ARRIVE)?;
            }
            for r in 1..size {
                self.post(r, TAG_BARRIER_RELEASE, Body::Token)?;
            }
        } else {
            self.post(0, TAG_BARRIER_ARRIVE, Body::Token)?;
            self.take(Some(0), TAG_BARRIER_RELEASE)?;
        }
        Ok(())
    }

    fn broadcast_u64(&mut self, root: usize, value: u64) -> CommResult<u64> {
        if self.rank == root {
            for r in (0..self.size()).filter(|&r| r != root) {
                self.post(r, TAG_BCAST, Body::Word(value))?;
            }
            Ok(value)
        } else {
            self.take_word(root, TAG_BCAST)
        }
    }

    fn allreduce_sum(&mut self, value: u64) -> CommResult<u64> {
        let size = self.size();
        if self.rank == 0 {
            let mut sum = value;
            for r in 1..size {
                sum += self.take_word(r, TAG_REDUCE_PART)?;
            }
            for r in 1..size {
                self.post(r, TAG_REDUCE_SUM, Body::Word(sum))?;
            }
            Ok(sum)
        } else {
            self.post(0, TAG_REDUCE_PART, Body::Word(value))?;
            self.take_word(0, TAG_REDUCE_SUM)
        }
    }

    fn send(&mut self, dst: usize, tag: u32, msg: LinkMsg) -> CommResult<()> {
        if tag > MAX_APP_TAG {
            return Err(CommError::ReservedTag(tag));
        }
        self.post(dst, tag, Body::Link(msg.to_wire()))
    }

    fn recv_any(&mut self, tag: u32) -> CommResult<LinkMsg> {
        if tag > MAX_APP_TAG {
            return Err(CommError::ReservedTag(tag));
        }
        match self.take(None, tag)?.body {
            Body::Link(raw) => LinkMsg::from_wire(raw),
            _ => Err(CommError::Protocol("expected link body".into())),
        }
    }

    fn gather_bytes(&mut self, root: usize, data: &[u8]) -> CommResult<Option<Vec<Vec<u8>>>> {
        if self.rank != root {
            self.post(root, TAG_GATHER_BYTES, Body::Bytes(data.to_vec()))?;
            return Ok(None);
        }
        let mut parts = Vec::with_capacity(self.size());
        for r in 0..self.size() {
            if r == root {
                parts.push(data.to_vec());
                continue;
            }
            match self.take(Some(r), TAG_GATHER_BYTES)?.body {
                Body::Bytes(b) => parts.push(b),
                _ => return Err(CommError::Protocol("expected byte body".into())),
            }
        }
        Ok(Some(parts))
    }

    fn gather_u32s(&mut self, root: usize, data: &[u32]) -> CommResult<Option<Vec<Vec<u32>>>> {
        if self.rank != root {
            self.post(root, TAG_GATHER_LENS, Body::Words(data.to_vec()))?;
            return Ok(None);
        }
        let mut parts = Vec::with_capacity(self.size());
        for r in 0..self.size() {
            if r == root {
                parts.push(data.to_vec());
                continue;
            }
            match self.take(Some(r), TAG_GATHER_LENS)?.body {
                Body::Words(w) => parts.push(w),
                _ => return Err(CommError::Protocol("expected word-vector body".into())),
            }
        }
        Ok(Some(parts))
    }
}

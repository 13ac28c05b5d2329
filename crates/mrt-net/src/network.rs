//! Transit network representation and builder.
//!
//! # Data layout
//!
//! Stations are numbered densely in insertion order; `StationId` indexes the
//! `names`, `popularity`, and `distance` tables directly.  Routes are stored
//! as resolved `StationId` sequences per line.
//!
//! # Derived edge data
//!
//! Every consecutive stop pair `(u, v)` on a line implies two directed
//! platforms, `u→v` and `v→u`, because trains run the line both ways.  Two
//! lines sharing the pair share the platform.  `build()` precomputes, per
//! station, the number of **distinct incoming** platforms; the tick engine
//! posts exactly that many receives per tick, so asymmetric topologies are
//! served correctly without assuming in-degree equals out-degree.

use rustc_hash::{FxHashMap, FxHashSet};

use mrt_core::{Direction, LineColor, StationId};

use crate::error::{NetError, NetResult};

// ── TransitNetwork ────────────────────────────────────────────────────────────

/// Validated, immutable description of the whole network.
///
/// Do not construct directly; use [`TransitNetworkBuilder`].
pub struct TransitNetwork {
    names:      Vec<String>,
    popularity: Vec<u64>,
    /// `distance[src][dst]` in ticks of travel; 0 means no edge.
    distance:   Vec<Vec<u64>>,
    /// Resolved stop sequence per line (may be empty for an unused line).
    routes:     [Vec<StationId>; 3],
    /// Distinct incoming platforms per station, over all lines and directions.
    incoming:   Vec<usize>,
}

impl TransitNetwork {
    // ── Dimensions and tables ─────────────────────────────────────────────

    pub fn station_count(&self) -> usize {
        self.names.len()
    }

    pub fn name(&self, id: StationId) -> &str {
        &self.names[id.index()]
    }

    pub fn popularity(&self, id: StationId) -> u64 {
        self.popularity[id.index()]
    }

    /// Travel time in ticks from `src` to `dst`; 0 means no direct edge.
    pub fn distance(&self, src: StationId, dst: StationId) -> u64 {
        self.distance[src.index()][dst.index()]
    }

    /// The stop sequence of `line`, low index = forward-terminal end.
    /// Empty for a line with no route (valid only if it spawns no trains).
    pub fn route(&self, line: LineColor) -> &[StationId] {
        &self.routes[line.index()]
    }

    // ── Terminals and turn-around ─────────────────────────────────────────

    /// `(forward_terminal, backward_terminal)` of `line`, or `None` if the
    /// line has no route.
    pub fn terminals(&self, line: LineColor) -> Option<(StationId, StationId)> {
        let route = self.route(line);
        Some((*route.first()?, *route.last()?))
    }

    /// Apply the turn-around rule for a train of `line` arriving at `at`:
    /// a backward train reaching the forward-terminal flips to forward, and
    /// symmetrically at the backward-terminal.  Elsewhere the direction is
    /// returned unchanged.
    pub fn turnaround(&self, line: LineColor, at: StationId, dir: Direction) -> Direction {
        match self.terminals(line) {
            Some((fwd, _)) if dir == Direction::Backward && at == fwd => Direction::Forward,
            Some((_, bwd)) if dir == Direction::Forward && at == bwd => Direction::Backward,
            _ => dir,
        }
    }

    // ── Per-station edge structure ────────────────────────────────────────

    /// Every `(line, direction, next_stop)` move leaving `station`, in the
    /// canonical creation order: lines in declaration order, each line's
    /// forward traversal first, then its backward traversal.
    ///
    /// Consumers de-duplicate by `next_stop` to obtain the platform set;
    /// the order of first appearance is the platform insertion order used
    /// to pair sends with receives.
    pub fn outgoing_moves(&self, station: StationId) -> Vec<(LineColor, Direction, StationId)> {
        let mut moves = Vec::new();
        for line in LineColor::ALL {
            let route = self.route(line);
            for i in 0..route.len().saturating_sub(1) {
                if route[i] == station {
                    moves.push((line, Direction::Forward, route[i + 1]));
                }
            }
            for i in (1..route.len()).rev() {
                if route[i] == station {
                    moves.push((line, Direction::Backward, route[i - 1]));
                }
            }
        }
        moves
    }

    /// Number of distinct outgoing platforms at `station`.
    pub fn outgoing_degree(&self, station: StationId) -> usize {
        let mut seen = FxHashSet::default();
        self.outgoing_moves(station)
            .into_iter()
            .filter(|&(_, _, dst)| seen.insert(dst))
            .count()
    }

    /// Number of distinct incoming platforms at `station` — the exact number
    /// of messages addressed to it each tick.
    pub fn incoming_degree(&self, station: StationId) -> usize {
        self.incoming[station.index()]
    }

    /// `true` when every station's in-degree equals its out-degree.  Holds
    /// for any closed two-way transit graph; the engine does not rely on it.
    pub fn is_degree_symmetric(&self) -> bool {
        (0..self.station_count())
            .map(|i| StationId(i as u32))
            .all(|s| self.incoming_degree(s) == self.outgoing_degree(s))
    }
}

// ── TransitNetworkBuilder ─────────────────────────────────────────────────────

/// Construct a [`TransitNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts stations, directed distances, and name-based routes in
/// any order.  `build()` resolves route names to ids, validates the topology,
/// and precomputes the per-station incoming-platform counts.
///
/// # Example
///
/// ```
/// use mrt_core::LineColor;
/// use mrt_net::TransitNetworkBuilder;
///
/// let mut b = TransitNetworkBuilder::new();
/// b.add_station("changi", 2);
/// b.add_station("tampines", 3);
/// b.link_by_name("changi", "tampines", 4);
/// b.route(LineColor::Green, &["changi", "tampines"]);
/// let net = b.build().unwrap();
/// assert_eq!(net.station_count(), 2);
/// ```
pub struct TransitNetworkBuilder {
    names:      Vec<String>,
    popularity: Vec<u64>,
    by_name:    FxHashMap<String, StationId>,
    edges:      Vec<(StationId, StationId, u64)>,
    routes:     [Vec<String>; 3],
    duplicate:  Option<String>,
}

impl TransitNetworkBuilder {
    pub fn new() -> Self {
        Self {
            names:      Vec::new(),
            popularity: Vec::new(),
            by_name:    FxHashMap::default(),
            edges:      Vec::new(),
            routes:     [Vec::new(), Vec::new(), Vec::new()],
            duplicate:  None,
        }
    }

    /// Add a station and return its `StationId` (sequential from 0).
    /// A repeated name is recorded and reported as fatal at `build()`.
    pub fn add_station(&mut self, name: &str, popularity: u64) -> StationId {
        let id = StationId(self.names.len() as u32);
        if self.by_name.insert(name.to_owned(), id).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(name.to_owned());
        }
        self.names.push(name.to_owned());
        self.popularity.push(popularity);
        id
    }

    /// Set the **directed** travel distance from `src` to `dst`, in ticks.
    pub fn set_distance(&mut self, src: StationId, dst: StationId, ticks: u64) {
        self.edges.push((src, dst, ticks));
    }

    /// Convenience: set the same distance in both directions (the common
    /// case — adjacency matrices for two-way lines are symmetric).
    pub fn link(&mut self, a: StationId, b: StationId, ticks: u64) {
        self.set_distance(a, b, ticks);
        self.set_distance(b, a, ticks);
    }

    /// Name-based [`link`](Self::link); ignores unknown names (the route
    /// validation in `build()` is what reports missing stations).
    pub fn link_by_name(&mut self, a: &str, b: &str, ticks: u64) {
        if let (Some(&a), Some(&b)) = (self.by_name.get(a), self.by_name.get(b)) {
            self.link(a, b, ticks);
        }
    }

    /// Declare the stop sequence of `line` by station name, first stop =
    /// forward-terminal.  Replaces any earlier declaration for the line.
    pub fn route(&mut self, line: LineColor, stops: &[&str]) {
        self.routes[line.index()] = stops.iter().map(|s| (*s).to_owned()).collect();
    }

    /// Consume the builder and produce a validated [`TransitNetwork`].
    pub fn build(self) -> NetResult<TransitNetwork> {
        if let Some(name) = self.duplicate {
            return Err(NetError::DuplicateStation(name));
        }

        let n = self.names.len();
        let mut distance = vec![vec![0u64; n]; n];
        for (src, dst, ticks) in &self.edges {
            distance[src.index()][dst.index()] = *ticks;
        }

        // ── Resolve and validate routes ───────────────────────────────────
        let mut routes: [Vec<StationId>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for line in LineColor::ALL {
            let stops = &self.routes[line.index()];
            if stops.is_empty() {
                continue; // unused line
            }
            if stops.len() < 2 {
                return Err(NetError::ShortLine { line, len: stops.len() });
            }
            let mut resolved = Vec::with_capacity(stops.len());
            for name in stops {
                let id = *self.by_name.get(name).ok_or_else(|| NetError::UnknownStation {
                    line,
                    name: name.clone(),
                })?;
                resolved.push(id);
            }
            // Both travel directions of every leg need a positive distance.
            for w in resolved.windows(2) {
                for (src, dst) in [(w[0], w[1]), (w[1], w[0])] {
                    if distance[src.index()][dst.index()] == 0 {
                        return Err(NetError::MissingDistance {
                            from: self.names[src.index()].clone(),
                            to:   self.names[dst.index()].clone(),
                        });
                    }
                }
            }
            routes[line.index()] = resolved;
        }

        // ── Derive incoming platform counts ───────────────────────────────
        //
        // One platform per distinct directed edge; count distinct sources
        // per destination.
        let mut platforms: FxHashSet<(StationId, StationId)> = FxHashSet::default();
        for route in &routes {
            for w in route.windows(2) {
                platforms.insert((w[0], w[1]));
                platforms.insert((w[1], w[0]));
            }
        }
        let mut incoming = vec![0usize; n];
        for &(_, dst) in &platforms {
            incoming[dst.index()] += 1;
        }

        Ok(TransitNetwork {
            names: self.names,
            popularity: self.popularity,
            distance,
            routes,
            incoming,
        })
    }
}

impl Default for TransitNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

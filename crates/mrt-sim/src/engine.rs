//! The `Engine` struct and its tick loop.

use std::io::Write;

use mrt_comm::{Communicator, LinkMsg, TrainDescriptor};
use mrt_core::{LoadTimeGen, StationId, Tick};
use mrt_net::{Partition, TransitNetwork};

use crate::error::SimResult;
use crate::observer::TickObserver;
use crate::snapshot;
use crate::spawn::Spawner;
use crate::station::Station;

// ── SimParams ─────────────────────────────────────────────────────────────────

/// Run-level knobs, identical on every rank.
#[derive(Clone, Debug)]
pub struct SimParams {
    /// Ticks to simulate.
    pub total_ticks: u64,
    /// Snapshots are emitted for the last `print_last` ticks.  A value
    /// larger than `total_ticks` prints every tick.
    pub print_last: u64,
    /// Fleet size per line, indexed by `LineColor`.
    pub trains_per_line: [u32; 3],
}

impl SimParams {
    /// First tick whose snapshot is printed.
    fn first_printed_tick(&self) -> u64 {
        self.total_ticks.saturating_sub(self.print_last)
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// One rank's share of the simulation.
///
/// `Engine<C, G>` owns the stations its rank is responsible for and drives
/// the phase protocol against its [`Communicator`] endpoint; `G` is the
/// per-platform load-time oracle.  Every rank constructs its engine from
/// the same network, parameters, and oracle factory — everything global is
/// derived deterministically, nothing is exchanged at startup.
pub struct Engine<'net, C, G> {
    net:       &'net TransitNetwork,
    partition: Partition,
    params:    SimParams,
    comm:      C,
    /// Owned stations, ascending station id.
    stations:  Vec<Station<G>>,
    spawner:   Spawner,
}

impl<'net, C, G> Engine<'net, C, G>
where
    C: Communicator,
    G: LoadTimeGen,
{
    /// Build this rank's engine.
    ///
    /// `make_gen` constructs each platform's oracle from
    /// `(src, dst, popularity of src)`; it must be pure so that every rank
    /// derives identical oracles for the platforms it owns.
    pub fn new<F>(
        net:      &'net TransitNetwork,
        params:   SimParams,
        comm:     C,
        make_gen: &F,
    ) -> SimResult<Self>
    where
        F: Fn(StationId, StationId, u64) -> G,
    {
        let partition = Partition::new(comm.size());
        let stations = partition
            .owned(comm.rank(), net.station_count())
            .into_iter()
            .map(|id| Station::build(net, id, make_gen))
            .collect();
        let spawner = Spawner::new(net, params.trains_per_line)?;
        Ok(Engine { net, partition, params, comm, stations, spawner })
    }

    /// This rank's id.
    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    /// Trains currently holding or loading at stations of this rank.
    pub fn local_held_count(&self) -> usize {
        self.stations.iter().map(Station::held_count).sum()
    }

    // ── Main loop ─────────────────────────────────────────────────────────

    /// Run the whole simulation.  Snapshot lines are written to `out` on
    /// rank 0 and flushed per tick; `out` is never touched on other ranks.
    pub fn run<W, O>(&mut self, out: &mut W, observer: &mut O) -> SimResult<()>
    where
        W: Write,
        O: TickObserver,
    {
        let first_printed = self.params.first_printed_tick();
        for t in 0..self.params.total_ticks {
            // Phase 0: rank 0 announces the tick.
            let tick = Tick(self.comm.broadcast_u64(0, t)?);
            observer.on_tick_start(tick);

            // Phase 1: spawn at terminals, all-reduce the id counter.
            self.spawner.step(tick, &mut self.stations, &mut self.comm)?;
            self.comm.barrier()?;

            // Phase 2 + 3: dispatch, then receive and load.
            self.dispatch(tick)?;
            self.receive_and_load(tick)?;
            self.comm.barrier()?;

            // Phase 4: snapshot, once the warm-up window has passed.
            if tick.0 >= first_printed {
                self.emit_snapshot(tick, out)?;
            }
            observer.on_tick_end(tick, self.spawner.spawned());
        }
        observer.on_sim_end(Tick(self.params.total_ticks));
        Ok(())
    }

    // ── Phase 2: dispatch ─────────────────────────────────────────────────
    //
    // Every platform sends exactly one message per tick — a departing
    // train or the sentinel — so receivers can size their loops by edge
    // count.  Promote runs after depart so a vacated traveller slot can be
    // refilled in the same tick.
    fn dispatch(&mut self, now: Tick) -> SimResult<()> {
        for station in &mut self.stations {
            for idx in 0..station.platform_count() {
                let dst = station.dst_of(idx);
                let msg = match station.depart(idx, now) {
                    Some(train) => LinkMsg::Train(TrainDescriptor {
                        line:      train.line,
                        id:        train.id,
                        direction: train.direction,
                    }),
                    None => LinkMsg::Empty,
                };
                self.comm.send(self.partition.rank_of(dst), dst.0, msg)?;
                station.promote(idx, now)?;
            }
        }
        Ok(())
    }

    // ── Phase 3: receive & load ───────────────────────────────────────────
    //
    // The receive count is the station's incoming-platform degree computed
    // from the line definitions — one receive per platform that targets it,
    // never the outgoing count (the two differ on asymmetric topologies).
    fn receive_and_load(&mut self, now: Tick) -> SimResult<()> {
        for station in &mut self.stations {
            for _ in 0..self.net.incoming_degree(station.id) {
                if let LinkMsg::Train(t) = self.comm.recv_any(station.id.0)? {
                    station.admit(self.net, t.line, t.id, t.direction, now)?;
                }
            }
            station.load_all(now)?;
        }
        Ok(())
    }

    // ── Phase 4: snapshot ─────────────────────────────────────────────────

    fn emit_snapshot<W: Write>(&mut self, tick: Tick, out: &mut W) -> SimResult<()> {
        let tokens = snapshot::collect_tokens(self.net, &self.stations);
        snapshot::emit_line(&mut self.comm, tick, &tokens, out)
    }
}

//! Integration tests for the tick engine.
//!
//! The scenario tests run the real multi-rank runner over a `LocalCluster`
//! and compare full stdout transcripts; the load oracle is pinned to a
//! constant so timelines are hand-computable.

use mrt_core::{
    Direction, FixedLoadGen, LineColor, PopularityLoadGen, StationId, Tick, TrainId,
};
use mrt_net::{TransitNetwork, TransitNetworkBuilder};

use crate::engine::SimParams;
use crate::runner::run_local;
use crate::{SimError, Station};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Two stations `A`, `B`; one green line between them.
fn two_station_net(distance: u64) -> TransitNetwork {
    let mut b = TransitNetworkBuilder::new();
    b.add_station("A", 1);
    b.add_station("B", 1);
    b.link_by_name("A", "B", distance);
    b.route(LineColor::Green, &["A", "B"]);
    b.build().unwrap()
}

/// Three stations in a line on green: `A–B–C`, unit distances.
fn linear3_net() -> TransitNetwork {
    let mut b = TransitNetworkBuilder::new();
    b.add_station("A", 1);
    b.add_station("B", 1);
    b.add_station("C", 1);
    b.link_by_name("A", "B", 1);
    b.link_by_name("B", "C", 1);
    b.route(LineColor::Green, &["A", "B", "C"]);
    b.build().unwrap()
}

fn params(total_ticks: u64, print_last: u64, trains_per_line: [u32; 3]) -> SimParams {
    SimParams { total_ticks, print_last, trains_per_line }
}

/// Run with a constant load time of 1 and return rank 0's stdout.
fn run_fixed(net: &TransitNetwork, params: &SimParams, procs: usize) -> String {
    let out = run_local(net, params, procs, |_, _, _| FixedLoadGen(1)).unwrap();
    String::from_utf8(out).unwrap()
}

// ── Holding queue ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use crate::HoldingQueue;
    use mrt_core::{Tick, TrainId};

    #[test]
    fn pops_in_arrival_then_id_order() {
        let mut q = HoldingQueue::new();
        q.push(Tick(5), TrainId(9));
        q.push(Tick(3), TrainId(20));
        q.push(Tick(5), TrainId(2));
        q.push(Tick(4), TrainId(7));

        let order: Vec<TrainId> = std::iter::from_fn(|| q.pop_ready(Tick(100))).collect();
        assert_eq!(order, vec![TrainId(20), TrainId(7), TrainId(2), TrainId(9)]);
    }

    #[test]
    fn ties_break_by_smaller_id() {
        let mut q = HoldingQueue::new();
        q.push(Tick(1), TrainId(3));
        q.push(Tick(1), TrainId(1));
        q.push(Tick(1), TrainId(2));
        assert_eq!(q.pop_ready(Tick(2)), Some(TrainId(1)));
        assert_eq!(q.pop_ready(Tick(2)), Some(TrainId(2)));
        assert_eq!(q.pop_ready(Tick(2)), Some(TrainId(3)));
    }

    #[test]
    fn same_tick_arrival_is_not_eligible() {
        let mut q = HoldingQueue::new();
        q.push(Tick(4), TrainId(0));
        assert_eq!(q.pop_ready(Tick(4)), None, "boards no earlier than t+1");
        assert_eq!(q.pop_ready(Tick(5)), Some(TrainId(0)));
        assert!(q.is_empty());
    }

    #[test]
    fn peek_does_not_remove() {
        let mut q = HoldingQueue::new();
        q.push(Tick(2), TrainId(6));
        assert_eq!(q.peek(), Some((Tick(2), TrainId(6))));
        assert_eq!(q.len(), 1);
    }
}

// ── Platform state machine ────────────────────────────────────────────────────

#[cfg(test)]
mod platform {
    use super::*;
    use crate::platform::Platform;
    use crate::train::{Train, TrainStatus};
    use rustc_hash::FxHashMap;

    fn train_map(ids: &[u32]) -> FxHashMap<TrainId, Train> {
        ids.iter()
            .map(|&i| {
                let id = TrainId(i);
                (id, Train::new(LineColor::Green, id, Direction::Forward, Tick(0)))
            })
            .collect()
    }

    #[test]
    fn full_cycle_timing() {
        // Load time 1, distance 2: board at t1, promote at t2, depart at t4.
        let mut p = Platform::new(StationId(1), 2, FixedLoadGen(1));
        let mut trains = train_map(&[0]);
        p.enqueue(Tick(0), TrainId(0));

        p.admit_load(Tick(0), &mut trains).unwrap();
        assert_eq!(p.loading(), None, "same-tick arrival must not board");

        p.admit_load(Tick(1), &mut trains).unwrap();
        assert_eq!(p.loading(), Some(TrainId(0)));
        assert_eq!(trains[&TrainId(0)].status, TrainStatus::Loading);

        p.promote(Tick(1), &mut trains).unwrap();
        assert!(p.travelling().is_none(), "load_deadline is t+1, not t");

        p.promote(Tick(2), &mut trains).unwrap();
        assert!(p.travelling().is_some());
        assert!(p.loading().is_none());
        assert!(!trains.contains_key(&TrainId(0)), "traveller leaves station custody");

        assert!(p.depart(Tick(3)).is_none(), "distance 2 → departs at t4");
        let gone = p.depart(Tick(4)).expect("journey complete");
        assert_eq!(gone.id, TrainId(0));
        assert_eq!(gone.status, TrainStatus::Travelling);
    }

    #[test]
    fn depart_frees_slot_for_same_tick_promote() {
        let mut p = Platform::new(StationId(1), 3, FixedLoadGen(1));
        let mut trains = train_map(&[0, 1]);
        p.enqueue(Tick(0), TrainId(0));
        p.enqueue(Tick(0), TrainId(1));

        // t1: train 0 boards; t2: promoted (departs at t5); train 1 boards.
        p.admit_load(Tick(1), &mut trains).unwrap();
        p.promote(Tick(2), &mut trains).unwrap();
        p.admit_load(Tick(2), &mut trains).unwrap();
        assert_eq!(p.loading(), Some(TrainId(1)));

        // t3, t4: train 1 finished loading but the traveller slot is taken.
        p.promote(Tick(3), &mut trains).unwrap();
        assert_eq!(p.loading(), Some(TrainId(1)), "slot busy until depart");

        // t5: depart then promote — both in the same tick.
        assert!(p.depart(Tick(5)).is_some());
        p.promote(Tick(5), &mut trains).unwrap();
        assert!(p.travelling().is_some());
        assert_eq!(p.travelling().map(|t| t.id), Some(TrainId(1)));
    }

    #[test]
    fn oracle_returning_zero_is_fatal() {
        let mut p = Platform::new(StationId(1), 1, FixedLoadGen(0));
        let mut trains = train_map(&[0]);
        p.enqueue(Tick(0), TrainId(0));
        match p.admit_load(Tick(1), &mut trains) {
            Err(SimError::BadLoadTime(id)) => assert_eq!(id, TrainId(0)),
            other => panic!("expected BadLoadTime, got {other:?}"),
        }
    }
}

// ── Station construction ──────────────────────────────────────────────────────

#[cfg(test)]
mod station {
    use super::*;

    fn fixed(_: StationId, _: StationId, _: u64) -> FixedLoadGen {
        FixedLoadGen(1)
    }

    #[test]
    fn shared_edge_builds_one_platform() {
        // Green and yellow both run A–B: one A→B platform, one queue.
        let mut b = TransitNetworkBuilder::new();
        b.add_station("A", 1);
        b.add_station("B", 1);
        b.link_by_name("A", "B", 2);
        b.route(LineColor::Green, &["A", "B"]);
        b.route(LineColor::Yellow, &["A", "B"]);
        let net = b.build().unwrap();

        let st = Station::build(&net, StationId(0), &fixed);
        assert_eq!(st.platform_count(), 1);
        assert_eq!(st.dst_of(0), StationId(1));
    }

    #[test]
    fn mid_line_station_has_two_platforms_in_creation_order() {
        let net = linear3_net();
        let st = Station::build(&net, StationId(1), &fixed);
        // Forward traversal first (→ C), then backward (→ A).
        assert_eq!(st.platform_count(), 2);
        assert_eq!(st.dst_of(0), StationId(2));
        assert_eq!(st.dst_of(1), StationId(0));
    }

    #[test]
    fn admit_turns_around_at_terminals() {
        let net = linear3_net();

        // A forward-terminal: backward arrival flips forward.
        let mut a = Station::build(&net, StationId(0), &fixed);
        a.admit(&net, LineColor::Green, TrainId(0), Direction::Backward, Tick(3)).unwrap();
        let t = a.held_trains().next().unwrap();
        assert_eq!(t.direction, Direction::Forward);
        assert_eq!(t.arrival_tick, Tick(3));

        // C backward-terminal: forward arrival flips backward.
        let mut c = Station::build(&net, StationId(2), &fixed);
        c.admit(&net, LineColor::Green, TrainId(1), Direction::Forward, Tick(5)).unwrap();
        assert_eq!(c.held_trains().next().unwrap().direction, Direction::Backward);

        // B mid-line: direction preserved.
        let mut mid = Station::build(&net, StationId(1), &fixed);
        mid.admit(&net, LineColor::Green, TrainId(2), Direction::Backward, Tick(1)).unwrap();
        assert_eq!(mid.held_trains().next().unwrap().direction, Direction::Backward);
    }

    #[test]
    fn spawn_takes_direction_as_given() {
        // spawn() is the terminal-creation path: no turn-around applied.
        let net = linear3_net();
        let mut a = Station::build(&net, StationId(0), &fixed);
        a.spawn(LineColor::Green, TrainId(0), Direction::Forward, Tick(0)).unwrap();
        assert_eq!(a.held_trains().next().unwrap().direction, Direction::Forward);
        assert_eq!(a.held_count(), 1);
    }
}

// ── Spawning policy ───────────────────────────────────────────────────────────

#[cfg(test)]
mod spawning {
    use super::*;
    use crate::spawn::Spawner;
    use mrt_comm::LocalCluster;

    #[test]
    fn three_trains_split_two_forward_one_backward() {
        // S3: ids g0, g2 spawn at A forward; g1 at C backward.
        let net = linear3_net();
        let mut comm = LocalCluster::new(1).pop().unwrap();
        let mut stations: Vec<_> = (0..3)
            .map(|i| Station::build(&net, StationId(i), &|_, _, _| FixedLoadGen(1)))
            .collect();
        let mut spawner = Spawner::new(&net, [3, 0, 0]).unwrap();

        spawner.step(Tick(0), &mut stations, &mut comm).unwrap();
        assert_eq!(spawner.spawned(), 2);
        spawner.step(Tick(1), &mut stations, &mut comm).unwrap();
        assert_eq!(spawner.spawned(), 3);
        assert!(spawner.done());

        let mut at_a: Vec<u32> = stations[0].held_trains().map(|t| t.id.0).collect();
        at_a.sort_unstable();
        assert_eq!(at_a, vec![0, 2]);
        let at_c: Vec<u32> = stations[2].held_trains().map(|t| t.id.0).collect();
        assert_eq!(at_c, vec![1]);
        assert_eq!(stations[2].held_trains().next().unwrap().direction, Direction::Backward);
    }

    #[test]
    fn single_train_spawns_forward_only() {
        let net = two_station_net(2);
        let mut comm = LocalCluster::new(1).pop().unwrap();
        let mut stations: Vec<_> = (0..2)
            .map(|i| Station::build(&net, StationId(i), &|_, _, _| FixedLoadGen(1)))
            .collect();
        let mut spawner = Spawner::new(&net, [1, 0, 0]).unwrap();
        spawner.step(Tick(0), &mut stations, &mut comm).unwrap();
        assert!(spawner.done());
        assert_eq!(stations[0].held_count(), 1);
        assert_eq!(stations[1].held_count(), 0);
    }

    #[test]
    fn trains_on_routeless_line_rejected() {
        let net = two_station_net(2);
        assert!(matches!(
            Spawner::new(&net, [1, 2, 0]),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn lines_interleave_ids_in_declaration_order() {
        // Green and blue both present: tick 0 assigns g0, g1, b2, b3.
        let mut b = TransitNetworkBuilder::new();
        b.add_station("A", 1);
        b.add_station("B", 1);
        b.link_by_name("A", "B", 2);
        b.route(LineColor::Green, &["A", "B"]);
        b.route(LineColor::Blue, &["A", "B"]);
        let net = b.build().unwrap();

        let mut comm = LocalCluster::new(1).pop().unwrap();
        let mut stations: Vec<_> = (0..2)
            .map(|i| Station::build(&net, StationId(i), &|_, _, _| FixedLoadGen(1)))
            .collect();
        let mut spawner = Spawner::new(&net, [2, 0, 2]).unwrap();
        spawner.step(Tick(0), &mut stations, &mut comm).unwrap();
        assert_eq!(spawner.spawned(), 4);

        let mut at_a: Vec<(LineColor, u32)> =
            stations[0].held_trains().map(|t| (t.line, t.id.0)).collect();
        at_a.sort_by_key(|&(_, id)| id);
        assert_eq!(at_a, vec![(LineColor::Green, 0), (LineColor::Blue, 2)]);
    }
}

// ── Reference scenarios ───────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn s1_two_trains_oscillate() {
        let net = two_station_net(2);
        let out = run_fixed(&net, &params(6, 6, [2, 0, 0]), 1);
        assert_eq!(
            out,
            "0: g0-A# g1-B#\n\
             1: g0-A% g1-B%\n\
             2: g0-A->B g1-B->A\n\
             3: g0-A->B g1-B->A\n\
             4: g0-B# g1-A#\n\
             5: g0-B% g1-A%\n"
        );
    }

    #[test]
    fn s2_single_train_spawns_at_forward_terminal() {
        let net = two_station_net(2);
        let out = run_fixed(&net, &params(6, 6, [1, 0, 0]), 1);
        assert_eq!(
            out,
            "0: g0-A#\n\
             1: g0-A%\n\
             2: g0-A->B\n\
             3: g0-A->B\n\
             4: g0-B#\n\
             5: g0-B%\n"
        );
    }

    #[test]
    fn s5_turnaround_at_far_terminal() {
        let net = linear3_net();
        let out = run_fixed(&net, &params(10, 10, [1, 0, 0]), 1);
        assert_eq!(
            out,
            "0: g0-A#\n\
             1: g0-A%\n\
             2: g0-A->B\n\
             3: g0-B#\n\
             4: g0-B%\n\
             5: g0-B->C\n\
             6: g0-C#\n\
             7: g0-C%\n\
             8: g0-C->B\n\
             9: g0-B#\n"
        );
    }

    #[test]
    fn s4_shared_platform_orders_by_arrival_then_id() {
        // Green and yellow share both platforms of the A–B edge; four trains
        // contend in two queues.  g0 (id 0) beats y2 (id 2) at A.
        let mut b = TransitNetworkBuilder::new();
        b.add_station("A", 1);
        b.add_station("B", 1);
        b.link_by_name("A", "B", 2);
        b.route(LineColor::Green, &["A", "B"]);
        b.route(LineColor::Yellow, &["A", "B"]);
        let net = b.build().unwrap();

        let out = run_fixed(&net, &params(5, 5, [2, 2, 0]), 1);
        assert_eq!(
            out,
            "0: g0-A# g1-B# y2-A# y3-B#\n\
             1: g0-A% g1-B% y2-A# y3-B#\n\
             2: g0-A->B g1-B->A y2-A% y3-B%\n\
             3: g0-A->B g1-B->A y2-A% y3-B%\n\
             4: g0-B# g1-A# y2-A->B y3-B->A\n"
        );
    }

    #[test]
    fn s6_tokens_sort_by_bytes_not_numerically() {
        // Enough trains that g10 and g2 are visible together at A: the
        // byte sort puts g10 between g1 and g2.
        let net = two_station_net(5);
        let out = run_fixed(&net, &params(6, 1, [22, 0, 0]), 1);
        assert_eq!(
            out,
            "5: g0-A->B g1-B->A g10-A# g11-B# g2-A% g3-B% g4-A# g5-B# g6-A# g7-B# g8-A# g9-B#\n"
        );
    }

    #[test]
    fn print_window_shorter_than_run() {
        let net = two_station_net(2);
        let out = run_fixed(&net, &params(6, 2, [2, 0, 0]), 1);
        assert_eq!(out, "4: g0-B# g1-A#\n5: g0-B% g1-A%\n");
    }

    #[test]
    fn zero_print_window_emits_nothing() {
        let net = two_station_net(2);
        let out = run_fixed(&net, &params(6, 0, [2, 0, 0]), 1);
        assert!(out.is_empty());
    }

    #[test]
    fn print_window_longer_than_run_prints_all() {
        let net = two_station_net(2);
        let out = run_fixed(&net, &params(3, 100, [1, 0, 0]), 1);
        assert_eq!(out.lines().count(), 3);
        assert!(out.starts_with("0:"));
    }
}

// ── Determinism across rank counts ────────────────────────────────────────────

#[cfg(test)]
mod determinism {
    use super::*;

    /// Five stations, three lines, shared edges, mixed popularities.
    fn multiline_net() -> TransitNetwork {
        let mut b = TransitNetworkBuilder::new();
        b.add_station("ang", 2);
        b.add_station("bedok", 3);
        b.add_station("clementi", 1);
        b.add_station("dover", 2);
        b.add_station("expo", 4);
        b.link_by_name("ang", "bedok", 2);
        b.link_by_name("bedok", "clementi", 1);
        b.link_by_name("clementi", "dover", 3);
        b.link_by_name("dover", "expo", 2);
        b.link_by_name("expo", "bedok", 4);
        b.link_by_name("clementi", "ang", 2);
        b.route(LineColor::Green, &["ang", "bedok", "clementi", "dover", "expo"]);
        b.route(LineColor::Yellow, &["expo", "bedok", "clementi"]);
        b.route(LineColor::Blue, &["clementi", "ang"]);
        b.build().unwrap()
    }

    fn run_popularity(procs: usize) -> String {
        let net = multiline_net();
        let p = params(40, 40, [5, 4, 3]);
        let out = run_local(&net, &p, procs, |src, dst, pop| {
            PopularityLoadGen::new(src, dst, pop)
        })
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn output_identical_for_1_2_3_ranks() {
        let p1 = run_popularity(1);
        let p2 = run_popularity(2);
        let p3 = run_popularity(3);
        assert_eq!(p1, p2, "P=1 vs P=2 diverged");
        assert_eq!(p1, p3, "P=1 vs P=3 diverged");
    }

    #[test]
    fn fleet_size_is_conserved() {
        // Spawning finishes by tick 2 (≤ 2 trains per line per tick);
        // every later snapshot must list all 12 trains exactly once.
        let out = run_popularity(1);
        for line in out.lines().skip(3) {
            let tokens = line.split(' ').count() - 1;
            assert_eq!(tokens, 12, "wrong token count in: {line}");
        }
    }

    #[test]
    fn more_ranks_than_stations_is_valid() {
        let net = two_station_net(2);
        let p = params(6, 6, [2, 0, 0]);
        let solo = run_fixed(&net, &p, 1);
        let spread = run_fixed(&net, &p, 5);
        assert_eq!(solo, spread);
    }

    #[test]
    fn s1_holds_at_two_ranks() {
        let net = two_station_net(2);
        let out = run_fixed(&net, &params(6, 6, [2, 0, 0]), 2);
        assert!(out.starts_with("0: g0-A# g1-B#\n"));
        assert_eq!(out, run_fixed(&net, &params(6, 6, [2, 0, 0]), 1));
    }
}

// ── Error propagation ─────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use super::*;

    #[test]
    fn config_error_surfaces_from_every_rank() {
        // Yellow has trains but no route: every rank fails at build.
        let net = two_station_net(2);
        let result = run_local(&net, &params(4, 4, [1, 1, 0]), 2, |_, _, _| FixedLoadGen(1));
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn zero_load_time_aborts_the_run() {
        let net = two_station_net(2);
        let result = run_local(&net, &params(4, 4, [1, 0, 0]), 1, |_, _, _| FixedLoadGen(0));
        assert!(matches!(result, Err(SimError::BadLoadTime(_))));
    }
}

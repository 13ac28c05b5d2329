//! mrt-cli — run a transit scenario from a JSON description.
//!
//! Usage: `mrt-cli <scenario.json> [ranks]`
//!
//! Snapshot lines go to stdout; progress goes to stderr.  `ranks` is the
//! number of simulation shards (threads); output is byte-identical for any
//! value, so pick whatever matches the machine.

mod scenario;

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;
use std::thread;

use anyhow::{bail, Context, Result};

use mrt_comm::LocalCluster;
use mrt_core::{PopularityLoadGen, StationId, Tick};
use mrt_sim::{Engine, NoopObserver, SimError, TickObserver};

use scenario::Scenario;

// ── Progress reporting ────────────────────────────────────────────────────────

/// Prints a stderr progress line roughly ten times over the run.
struct Progress {
    every: u64,
}

impl Progress {
    fn new(total_ticks: u64) -> Self {
        Progress { every: (total_ticks / 10).max(1) }
    }
}

impl TickObserver for Progress {
    fn on_tick_end(&mut self, tick: Tick, spawned: u64) {
        if tick.0 % self.every == 0 {
            eprintln!("tick {tick}: {spawned} trains live");
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        eprintln!("done after {final_tick} ticks");
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: mrt-cli <scenario.json> [ranks]");
    };
    let ranks: usize = match args.next() {
        Some(n) => n.parse().context("ranks must be a positive integer")?,
        None => 1,
    };
    if ranks == 0 {
        bail!("ranks must be at least 1");
    }

    let file = File::open(&path).with_context(|| format!("cannot open {path}"))?;
    let spec: Scenario =
        serde_json::from_reader(BufReader::new(file)).context("malformed scenario file")?;
    let (net, params) = spec.into_inputs()?;

    let make_gen = |src: StationId, dst: StationId, popularity: u64| {
        PopularityLoadGen::new(src, dst, popularity)
    };

    let comms = LocalCluster::new(ranks);
    thread::scope(|scope| -> Result<()> {
        let net = &net;
        let params = &params;
        let make_gen = &make_gen;
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                scope.spawn(move || -> mrt_sim::SimResult<()> {
                    let mut engine = Engine::new(net, params.clone(), comm, make_gen)?;
                    if engine.rank() == 0 {
                        engine.run(&mut io::stdout(), &mut Progress::new(params.total_ticks))
                    } else {
                        engine.run(&mut io::sink(), &mut NoopObserver)
                    }
                })
            })
            .collect();

        for (rank, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(SimError::WorkerPanic { rank }.into()),
            }
        }
        Ok(())
    })
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

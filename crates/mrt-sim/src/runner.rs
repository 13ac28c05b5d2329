//! Multi-rank driver over the in-process transport.

use std::thread;

use mrt_comm::LocalCluster;
use mrt_core::{LoadTimeGen, StationId};
use mrt_net::TransitNetwork;

use crate::engine::{Engine, SimParams};
use crate::error::{SimError, SimResult};
use crate::observer::NoopObserver;

/// Run the whole simulation on `procs` ranks (one thread each) and return
/// rank 0's snapshot output.
///
/// `make_gen` builds each platform's load-time oracle from
/// `(src, dst, popularity of src)`; it is shared by all rank threads and
/// must be pure.  The first rank error (or panic) aborts the run and is
/// returned; per the lock-step model there is no partial recovery.
pub fn run_local<G, F>(
    net:      &TransitNetwork,
    params:   &SimParams,
    procs:    usize,
    make_gen: F,
) -> SimResult<Vec<u8>>
where
    G: LoadTimeGen,
    F: Fn(StationId, StationId, u64) -> G + Sync,
{
    let comms = LocalCluster::new(procs);
    thread::scope(|scope| {
        let make_gen = &make_gen;
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                scope.spawn(move || -> SimResult<Vec<u8>> {
                    let mut out = Vec::new();
                    let mut engine = Engine::new(net, params.clone(), comm, make_gen)?;
                    engine.run(&mut out, &mut NoopObserver)?;
                    Ok(out)
                })
            })
            .collect();

        let mut rank0_output = Vec::new();
        for (rank, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(bytes)) => {
                    if rank == 0 {
                        rank0_output = bytes;
                    }
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => return Err(SimError::WorkerPanic { rank }),
            }
        }
        Ok(rank0_output)
    })
}

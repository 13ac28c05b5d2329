//! Snapshot gathering: per-rank token production, the two variable-length
//! gathers, and rank 0's sorted emission.
//!
//! # Token grammar
//!
//! One token per train, no interior spaces (`C` = line code, `I` = decimal
//! train id, `S`/`D` = station names):
//!
//! | Token          | Meaning                        |
//! |----------------|--------------------------------|
//! | `CI-S#`        | holding at station `S`         |
//! | `CI-S%`        | loading at platform `S`        |
//! | `CI-S->D`      | travelling on the link `S → D` |
//!
//! # Transport
//!
//! Each rank concatenates its tokens into one byte buffer and records the
//! per-token byte lengths; both are gathered to rank 0, which re-slices,
//! sorts the full token list in lexicographic **byte** order (so `g10`
//! sorts before `g2`), and prints `"{tick}: t1 t2 … tn\n"`, flushing per
//! line so an abort never loses ticks already emitted.

use std::io::Write;

use mrt_comm::{CommError, Communicator};
use mrt_core::{LoadTimeGen, Tick};
use mrt_net::TransitNetwork;

use crate::error::SimResult;
use crate::station::Station;
use crate::train::TrainStatus;

/// Format the tokens for every train owned by this rank: holding and
/// loading trains from each station's custody map, travelling trains from
/// each platform's traveller slot.
pub fn collect_tokens<G: LoadTimeGen>(
    net:      &TransitNetwork,
    stations: &[Station<G>],
) -> Vec<String> {
    let mut tokens = Vec::new();
    for station in stations {
        for train in station.held_trains() {
            let suffix = match train.status {
                TrainStatus::Loading => '%',
                _ => '#',
            };
            tokens.push(format!(
                "{}{}-{}{}",
                train.line.code(),
                train.id,
                station.name,
                suffix
            ));
        }
        for platform in station.platforms() {
            if let Some(train) = platform.travelling() {
                tokens.push(format!(
                    "{}{}-{}->{}",
                    train.line.code(),
                    train.id,
                    station.name,
                    net.name(platform.dst)
                ));
            }
        }
    }
    tokens
}

/// Gather all ranks' tokens to rank 0, sort, and print one snapshot line.
///
/// Every rank must call this on a print tick; only rank 0 writes to `out`.
pub fn emit_line<C, W>(
    comm:   &mut C,
    tick:   Tick,
    tokens: &[String],
    out:    &mut W,
) -> SimResult<()>
where
    C: Communicator,
    W: Write,
{
    let mut payload = Vec::new();
    let mut lengths = Vec::with_capacity(tokens.len());
    for token in tokens {
        payload.extend_from_slice(token.as_bytes());
        lengths.push(token.len() as u32);
    }

    let gathered_bytes = comm.gather_bytes(0, &payload)?;
    let gathered_lens = comm.gather_u32s(0, &lengths)?;

    let (Some(byte_parts), Some(len_parts)) = (gathered_bytes, gathered_lens) else {
        return Ok(()); // not rank 0
    };

    let mut all = Vec::new();
    for (bytes, lens) in byte_parts.iter().zip(&len_parts) {
        let mut offset = 0usize;
        for &len in lens {
            let end = offset + len as usize;
            let slice = bytes.get(offset..end).ok_or_else(|| {
                CommError::Protocol("snapshot lengths exceed payload".into())
            })?;
            let token = std::str::from_utf8(slice)
                .map_err(|_| CommError::Protocol("snapshot payload not utf-8".into()))?;
            all.push(token.to_owned());
            offset = end;
        }
    }

    all.sort_unstable();
    write!(out, "{tick}:")?;
    for token in &all {
        write!(out, " {token}")?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

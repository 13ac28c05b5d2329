//! Scenario file schema and conversion into simulator inputs.
//!
//! The file carries exactly the driver inputs: station table, distance
//! matrix, the three line routes, per-line fleet sizes, and the tick
//! window.  Example:
//!
//! ```json
//! {
//!   "stations": [
//!     { "name": "changi", "popularity": 2 },
//!     { "name": "tampines", "popularity": 3 }
//!   ],
//!   "distances": [[0, 4], [4, 0]],
//!   "lines": { "green": ["changi", "tampines"] },
//!   "num_trains": { "green": 2 },
//!   "total_ticks": 10,
//!   "tick_print_count": 5
//! }
//! ```

use anyhow::{ensure, Result};
use serde::Deserialize;

use mrt_core::LineColor;
use mrt_net::{TransitNetwork, TransitNetworkBuilder};
use mrt_sim::SimParams;

#[derive(Deserialize)]
pub struct Scenario {
    stations:         Vec<StationSpec>,
    /// Square matrix of travel times in ticks; 0 = no edge.
    distances:        Vec<Vec<u64>>,
    #[serde(default)]
    lines:            PerLine<Vec<String>>,
    #[serde(default)]
    num_trains:       PerLine<u32>,
    total_ticks:      u64,
    tick_print_count: u64,
}

#[derive(Deserialize)]
struct StationSpec {
    name:       String,
    popularity: u64,
}

/// One value per line, keyed by line name; missing lines take the default.
#[derive(Deserialize, Default)]
#[serde(default)]
struct PerLine<T: Default> {
    green:  T,
    yellow: T,
    blue:   T,
}

impl<T: Default> PerLine<T> {
    fn get(&self, line: LineColor) -> &T {
        match line {
            LineColor::Green  => &self.green,
            LineColor::Yellow => &self.yellow,
            LineColor::Blue   => &self.blue,
        }
    }
}

impl Scenario {
    /// Validate shape and hand off to the topology builder.
    pub fn into_inputs(self) -> Result<(TransitNetwork, SimParams)> {
        let n = self.stations.len();
        ensure!(n > 0, "scenario has no stations");
        ensure!(
            self.distances.len() == n && self.distances.iter().all(|row| row.len() == n),
            "distance matrix must be {n}×{n} to match the station list"
        );

        let mut builder = TransitNetworkBuilder::new();
        let ids: Vec<_> = self
            .stations
            .iter()
            .map(|s| builder.add_station(&s.name, s.popularity))
            .collect();
        for (i, row) in self.distances.iter().enumerate() {
            for (j, &ticks) in row.iter().enumerate() {
                if ticks > 0 {
                    builder.set_distance(ids[i], ids[j], ticks);
                }
            }
        }
        for line in LineColor::ALL {
            let stops: Vec<&str> = self.lines.get(line).iter().map(String::as_str).collect();
            if !stops.is_empty() {
                builder.route(line, &stops);
            }
        }
        let net = builder.build()?;

        let params = SimParams {
            total_ticks:     self.total_ticks,
            print_last:      self.tick_print_count,
            trains_per_line: [
                *self.num_trains.get(LineColor::Green),
                *self.num_trains.get(LineColor::Yellow),
                *self.num_trains.get(LineColor::Blue),
            ],
        };
        Ok((net, params))
    }
}

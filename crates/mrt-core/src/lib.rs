//! `mrt-core` — foundational types for the `rust_mrt` transit simulator.
//!
//! This crate is a dependency of every other `mrt-*` crate.  It intentionally
//! has no `mrt-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                          |
//! |------------|---------------------------------------------------|
//! | [`ids`]    | `StationId`, `TrainId`                            |
//! | [`line`]   | `LineColor`, `Direction`                          |
//! | [`time`]   | `Tick`                                            |
//! | [`load`]   | `LoadTimeGen`, `PopularityLoadGen`, `FixedLoadGen`|
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod line;
pub mod load;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{StationId, TrainId};
pub use line::{Direction, LineColor};
pub use load::{FixedLoadGen, LoadTimeGen, PopularityLoadGen};
pub use time::Tick;

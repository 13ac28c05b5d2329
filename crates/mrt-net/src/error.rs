//! Topology validation errors.
//!
//! All variants are fatal: the simulation refuses to start on an inconsistent
//! network description.

use thiserror::Error;

use mrt_core::LineColor;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("{line} line references unknown station '{name}'")]
    UnknownStation { line: LineColor, name: String },

    #[error("{line} line has {len} station(s); a line needs at least 2")]
    ShortLine { line: LineColor, len: usize },

    #[error("no distance between adjacent stations '{from}' and '{to}'")]
    MissingDistance { from: String, to: String },

    #[error("duplicate station name '{0}'")]
    DuplicateStation(String),
}

pub type NetResult<T> = Result<T, NetError>;

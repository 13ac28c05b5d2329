//! Line identity and travel direction.
//!
//! The network carries exactly three named lines.  `LineColor` is both the
//! line's identity and its position in every fixed iteration order (spawn
//! sequencing, platform creation); `Direction` records which way a train is
//! traversing its line's station list.

use std::fmt;

// ── LineColor ─────────────────────────────────────────────────────────────────

/// One of the three transit lines.
///
/// The declaration order (green, yellow, blue) is load-bearing: spawn id
/// assignment and platform creation iterate lines in exactly this order on
/// every rank.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineColor {
    Green,
    Yellow,
    Blue,
}

impl LineColor {
    /// All lines, in the fixed global iteration order.
    pub const ALL: [LineColor; 3] = [LineColor::Green, LineColor::Yellow, LineColor::Blue];

    /// Position in [`ALL`](Self::ALL); used to index per-line tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            LineColor::Green  => 0,
            LineColor::Yellow => 1,
            LineColor::Blue   => 2,
        }
    }

    /// Single-letter code used in snapshot tokens (`g`, `y`, `b`).
    #[inline]
    pub fn code(self) -> char {
        match self {
            LineColor::Green  => 'g',
            LineColor::Yellow => 'y',
            LineColor::Blue   => 'b',
        }
    }

    /// Inverse of [`index`](Self::index).  Returns `None` for out-of-range
    /// values (e.g. a corrupt wire message).
    pub fn from_index(i: usize) -> Option<LineColor> {
        Self::ALL.get(i).copied()
    }
}

impl fmt::Display for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineColor::Green  => "green",
            LineColor::Yellow => "yellow",
            LineColor::Blue   => "blue",
        };
        f.write_str(name)
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// Which way a train traverses its line's station list.
///
/// `Forward` runs low-index → high-index; `Backward` is the reverse.  Only
/// terminal stations flip a train's direction (the turn-around rule).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// The opposite direction.
    #[inline]
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Forward  => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Forward  => "forward",
            Direction::Backward => "backward",
        };
        f.write_str(name)
    }
}

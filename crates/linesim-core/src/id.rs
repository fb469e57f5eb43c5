use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a workstation inside a [`LineTopology`](crate::line::LineTopology).
    pub struct StationId;
}

/// Display number of a station, assigned in load order starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationNumber(pub u32);

/// Hands out [`StationNumber`]s in increasing order.
///
/// One numbering is shared by every station file of a run, so numbers stay
/// unique across files without any process-wide counter.
#[derive(Debug, Clone, Default)]
pub struct StationNumbering {
    last: u32,
}

impl StationNumbering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next number.
    pub fn next_number(&mut self) -> StationNumber {
        self.last += 1;
        StationNumber(self.last)
    }

    /// How many numbers have been handed out.
    pub fn issued(&self) -> u32 {
        self.last
    }
}

impl std::fmt::Display for StationNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

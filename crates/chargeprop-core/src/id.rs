//! Strongly-typed identifiers for events and deposits.

use std::fmt;

/// Identifies one simulated event.
///
/// Event ids select the random sub-stream used for that event, so two
/// runs with the same seed and the same event ids draw identical numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Position of a deposit within its event's deposit collection.
///
/// Propagated charges refer back to their origin through this index
/// instead of holding a reference into the upstream collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepositIndex(pub usize);

impl fmt::Display for DepositIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for DepositIndex {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

//! Charge carrier types and transport states.

use std::fmt;

/// Type of a charge carrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CarrierType {
    /// Negatively charged carrier, drifts against the electric field.
    Electron,
    /// Positively charged carrier, drifts along the electric field.
    Hole,
}

impl CarrierType {
    /// Sign of the carrier's charge: `-1.0` for electrons, `+1.0` for holes.
    ///
    /// Multiplies mobility × field in the drift velocity.
    pub fn sign(self) -> f64 {
        match self {
            Self::Electron => -1.0,
            Self::Hole => 1.0,
        }
    }
}

impl fmt::Display for CarrierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Electron => write!(f, "electron"),
            Self::Hole => write!(f, "hole"),
        }
    }
}

/// Transport state of a charge carrier group.
///
/// Every group starts in [`Motion`](Self::Motion). The physical terminal
/// states are [`Halted`](Self::Halted), [`Recombined`](Self::Recombined) and
/// [`Trapped`](Self::Trapped). [`Unknown`](Self::Unknown) is only ever
/// assigned by diagnostic trajectory recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CarrierState {
    /// Still drifting. A propagated charge may end in this state when the
    /// integration window closed before any terminal condition was met.
    #[default]
    Motion,
    /// Left the sensor volume; the final position is the boundary intercept.
    Halted,
    /// Removed by recombination.
    Recombined,
    /// Captured by a trap and not released within the integration window.
    Trapped,
    /// Fate not determined (diagnostic only).
    Unknown,
}

impl CarrierState {
    /// Whether this state ends propagation.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Motion)
    }
}

impl fmt::Display for CarrierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Motion => write!(f, "motion"),
            Self::Halted => write!(f, "halted"),
            Self::Recombined => write!(f, "recombined"),
            Self::Trapped => write!(f, "trapped"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

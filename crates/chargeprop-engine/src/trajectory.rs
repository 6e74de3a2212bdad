//! Diagnostic trajectory recording.
//!
//! When enabled, every charge group records its position at fixed
//! intervals of elapsed time. Recorded trajectories carry a diagnostic
//! state that differs from the transport state: groups that ran out of
//! integration time or ended near the backside are marked
//! [`CarrierState::Unknown`].

use chargeprop_core::{CarrierState, CarrierType, Point3};

/// Sampled path of one charge group.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    /// Global time of the originating deposit.
    pub start_time: f64,
    /// Group size before gain.
    pub charge: u32,
    /// Carrier type.
    pub carrier: CarrierType,
    /// Diagnostic final state.
    pub state: CarrierState,
    /// Positions at multiples of the sampling interval.
    pub points: Vec<Point3<f64>>,
}

/// Collects positions for one group at a fixed sampling interval.
#[derive(Clone, Debug)]
pub struct TrajectoryRecorder {
    interval: f64,
    points: Vec<Point3<f64>>,
}

impl TrajectoryRecorder {
    /// Recorder sampling every `interval` of elapsed time.
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            points: Vec::new(),
        }
    }

    /// Record `position` for every sampling slot up to `time` not yet filled.
    ///
    /// Slots skipped over by a long step or a detrapping delay repeat the
    /// current position.
    pub fn sample(&mut self, time: f64, position: &Point3<f64>) {
        let slot = (time / self.interval) as usize;
        while self.points.len() <= slot {
            self.points.push(*position);
        }
    }

    /// Number of recorded points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Close the recording.
    pub fn finish(
        self,
        start_time: f64,
        charge: u32,
        carrier: CarrierType,
        state: CarrierState,
    ) -> Trajectory {
        Trajectory {
            start_time,
            charge,
            carrier,
            state,
            points: self.points,
        }
    }
}

/// Diagnostic state of a finished group.
///
/// `expired` reports whether the integration window was exhausted,
/// `backside` whether the last interior position lies within 5% of the
/// sensor thickness from the back face.
pub fn diagnostic_state(state: CarrierState, expired: bool, backside: bool) -> CarrierState {
    if expired || backside {
        CarrierState::Unknown
    } else {
        state
    }
}

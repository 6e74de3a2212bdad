//! Deposited (input) and propagated (output) charge records.

use nalgebra::Point3;

use crate::carrier::{CarrierState, CarrierType};
use crate::id::DepositIndex;

/// A set of charge carriers created at one point in the sensor.
///
/// Produced once per event by the upstream deposition stage and read-only
/// for the duration of propagation. Positions are in the sensor's local
/// frame, times in ns.
#[derive(Clone, Debug, PartialEq)]
pub struct DepositedCharge {
    /// Deposit position in local sensor coordinates.
    pub local_position: Point3<f64>,
    /// Deposit position in global coordinates.
    pub global_position: Point3<f64>,
    /// Carrier type of every carrier in the deposit.
    pub carrier: CarrierType,
    /// Number of carriers.
    pub charge: u32,
    /// Deposition time relative to the sensor's local clock.
    pub local_time: f64,
    /// Deposition time relative to the event start.
    pub global_time: f64,
}

impl DepositedCharge {
    /// Create a deposit whose global frame coincides with the local one.
    pub fn new(position: Point3<f64>, carrier: CarrierType, charge: u32, time: f64) -> Self {
        Self {
            local_position: position,
            global_position: position,
            carrier,
            charge,
            local_time: time,
            global_time: time,
        }
    }
}

/// The outcome of transporting one charge group.
#[derive(Clone, Debug, PartialEq)]
pub struct PropagatedCharge {
    /// Final position in local sensor coordinates.
    pub local_position: Point3<f64>,
    /// Final position in global coordinates.
    pub global_position: Point3<f64>,
    /// Carrier type, inherited from the deposit.
    pub carrier: CarrierType,
    /// Group size multiplied by the cumulative gain, rounded to an integer.
    pub charge: u32,
    /// Deposit local time plus transport time.
    pub local_time: f64,
    /// Deposit global time plus transport time.
    pub global_time: f64,
    /// State at the end of transport.
    pub state: CarrierState,
    /// Index of the originating deposit within the event.
    pub deposit: DepositIndex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_deposit_shares_frames() {
        let d = DepositedCharge::new(Point3::new(0.1, 0.2, 0.3), CarrierType::Hole, 42, 1.5);
        assert_eq!(d.local_position, d.global_position);
        assert_eq!(d.local_time, d.global_time);
        assert_eq!(d.charge, 42);
    }
}

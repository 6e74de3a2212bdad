//! Deposit fixtures.

use chargeprop_core::{CarrierType, DepositedCharge, Point3};

/// `charge` carriers of `carrier` at `position`, deposited at time zero.
pub fn deposit_at(position: Point3<f64>, carrier: CarrierType, charge: u32) -> DepositedCharge {
    DepositedCharge::new(position, carrier, charge, 0.0)
}

/// Electrons at `position`.
pub fn electron_deposit(position: Point3<f64>, charge: u32) -> DepositedCharge {
    deposit_at(position, CarrierType::Electron, charge)
}

/// Holes at `position`.
pub fn hole_deposit(position: Point3<f64>, charge: u32) -> DepositedCharge {
    deposit_at(position, CarrierType::Hole, charge)
}

/// Electron-hole pairs spread evenly along z between `z_from` and `z_to`,
/// as left by a straight track through the sensor.
///
/// Produces `count` points with one electron and one hole deposit each.
pub fn deposits_along_z(count: usize, z_from: f64, z_to: f64, charge: u32) -> Vec<DepositedCharge> {
    let mut deposits = Vec::with_capacity(2 * count);
    for i in 0..count {
        let f = if count > 1 {
            i as f64 / (count - 1) as f64
        } else {
            0.5
        };
        let position = Point3::new(0.0, 0.0, z_from + f * (z_to - z_from));
        deposits.push(electron_deposit(position, charge));
        deposits.push(hole_deposit(position, charge));
    }
    deposits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_endpoints() {
        let d = deposits_along_z(3, -0.1, 0.1, 80);
        assert_eq!(d.len(), 6);
        assert!((d[0].local_position.z + 0.1).abs() < 1e-15);
        assert!((d[5].local_position.z - 0.1).abs() < 1e-15);
        assert_eq!(d[1].carrier, CarrierType::Hole);
    }
}

//! Drift velocity from mobility and fields.

use chargeprop_core::{CarrierType, Vector3};

/// Hall scattering factor for `carrier` in silicon.
pub fn hall_factor(carrier: CarrierType) -> f64 {
    match carrier {
        CarrierType::Electron => 1.15,
        CarrierType::Hole => 0.9,
    }
}

/// Drift velocity without magnetic field: `sign * mobility * E`.
pub fn drift_velocity(carrier: CarrierType, mobility: f64, efield: &Vector3<f64>) -> Vector3<f64> {
    carrier.sign() * mobility * efield
}

/// Drift velocity including the Hall deflection in the magnetic field `bfield`.
///
/// The carrier sign enters both the `E x B` term and the overall prefactor.
pub fn drift_velocity_in_magnetic_field(
    carrier: CarrierType,
    mobility: f64,
    efield: &Vector3<f64>,
    bfield: &Vector3<f64>,
) -> Vector3<f64> {
    let sign = carrier.sign();
    let hall = hall_factor(carrier);
    let mu_hall = mobility * hall;

    let exb = efield.cross(bfield);
    let term1 = sign * mu_hall * exb;
    let term2 = mu_hall * mu_hall * efield.dot(bfield) * bfield;
    let rnorm = 1.0 + mu_hall * mu_hall * bfield.dot(bfield);

    sign * mobility * (efield + term1 + term2) / rnorm
}

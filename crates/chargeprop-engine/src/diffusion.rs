//! Thermal diffusion of a charge group during one step.

use chargeprop_core::units::BOLTZMANN_K;
use chargeprop_core::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Random displacement after a step of length `timestep`.
///
/// Uses the Einstein relation `D = kT / e * mobility` and draws three
/// independent normal samples with `sigma = sqrt(2 D dt)`, in x, y, z order.
pub fn diffusion_step<R: Rng + ?Sized>(
    rng: &mut R,
    mobility: f64,
    temperature: f64,
    timestep: f64,
) -> Vector3<f64> {
    let diffusion_constant = BOLTZMANN_K * temperature * mobility;
    let sigma = (2.0 * diffusion_constant * timestep).sqrt();
    match Normal::new(0.0, sigma) {
        Ok(gauss) => {
            let x = gauss.sample(rng);
            let y = gauss.sample(rng);
            let z = gauss.sample(rng);
            Vector3::new(x, y, z)
        }
        Err(_) => {
            log::trace!("Skipping diffusion with invalid width {sigma}");
            Vector3::zeros()
        }
    }
}

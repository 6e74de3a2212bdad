//! Benchmark profiles for the chargeprop transport engine.
//!
//! Provides pre-built sensor setups for benchmarks:
//!
//! - [`reference_module`]: 300 µm planar sensor at 100 kV/cm, no trapping
//! - [`irradiated_module`]: same sensor with recombination, fluence-dependent
//!   trapping and detrapping enabled
//! - [`track_deposits`]: electron-hole pairs along a perpendicular track

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use chargeprop_core::units::{NS, PER_CM2, PER_CM3, UM};
use chargeprop_core::{DepositedCharge, Vector3};
use chargeprop_engine::{ChargePropagation, ConfigError, PropagationConfig};
use chargeprop_test_utils::{deposits_along_z, BoxSensor, UniformField};

/// Sensor thickness used by all profiles.
pub const THICKNESS: f64 = 300.0 * UM;

fn sensor() -> Arc<BoxSensor> {
    Arc::new(BoxSensor::new(Vector3::new(2.0, 2.0, THICKNESS)))
}

fn field() -> UniformField {
    UniformField::new(Vector3::new(0.0, 0.0, -0.01)).with_doping(-1e12 * PER_CM3)
}

/// Configuration shared by the profiles; holes are propagated too.
pub fn reference_config() -> PropagationConfig {
    PropagationConfig {
        propagate_holes: true,
        ..Default::default()
    }
}

/// Unirradiated sensor with drift, diffusion and nothing else.
pub fn reference_module() -> Result<ChargePropagation, ConfigError> {
    ChargePropagation::new(reference_config(), Arc::new(field()), sensor())
}

/// Sensor after 1e15 neq/cm² with SRH recombination and trapping.
pub fn irradiated_module() -> Result<ChargePropagation, ConfigError> {
    let mut config = reference_config();
    config.recombination_model = "srh".into();
    config.trapping_model = "ljubljana".into();
    config.detrapping_model = "constant".into();
    config.model_parameters.fluence = Some(1e15 * PER_CM2);
    config.model_parameters.detrapping_time_electron = Some(1.0 * NS);
    config.model_parameters.detrapping_time_hole = Some(1.0 * NS);
    ChargePropagation::new(config, Arc::new(field()), sensor())
}

/// `points` deposit pairs of `charge` carriers each along a track through
/// the full thickness.
pub fn track_deposits(points: usize, charge: u32) -> Vec<DepositedCharge> {
    let edge = 0.49 * THICKNESS;
    deposits_along_z(points, -edge, edge, charge)
}

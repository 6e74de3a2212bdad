//! Propagation configuration, validation, and error types.
//!
//! [`PropagationConfig`] holds every option of the transport module.
//! [`validate()`](PropagationConfig::validate) checks structural invariants
//! before any model is built; the model selectors themselves are resolved
//! by [`ChargePropagation::new`](crate::ChargePropagation::new).

use std::error::Error;
use std::fmt;

use chargeprop_core::units::{NM, NS};
use chargeprop_core::ModelError;
use chargeprop_physics::ModelParameters;

use crate::integrator::Tableau;

// ── PropagationConfig ──────────────────────────────────────────────

/// Options of the charge propagation module, in internal units.
#[derive(Clone, Debug)]
pub struct PropagationConfig {
    /// Target spatial precision of one integration step. Default: 0.25 nm.
    pub spatial_precision: f64,
    /// Initial timestep of every group. Default: 0.01 ns.
    pub timestep_start: f64,
    /// Lower bound of the adaptive timestep. Default: 0.001 ns.
    pub timestep_min: f64,
    /// Upper bound of the adaptive timestep. Default: 0.5 ns.
    pub timestep_max: f64,
    /// Transport stops once deposit time plus drift time reaches this. Default: 25 ns.
    pub integration_time: f64,
    /// Nominal number of carriers per charge group. Default: 10.
    pub charge_per_step: u32,
    /// Upper bound on groups per deposit; 0 disables the bound. Default: 1000.
    pub max_charge_groups: u32,
    /// Sensor temperature in K. Default: 293.15.
    pub temperature: f64,
    /// Mobility model selector. Default: `jacoboni`.
    pub mobility_model: String,
    /// Recombination model selector. Default: `none`.
    pub recombination_model: String,
    /// Trapping model selector. Default: `none`.
    pub trapping_model: String,
    /// Detrapping model selector. Default: `none`.
    pub detrapping_model: String,
    /// Impact ionization model selector. Default: `none`.
    pub multiplication_model: String,
    /// Extra parameters required by some models.
    pub model_parameters: ModelParameters,
    /// Propagate electron deposits. Default: true.
    pub propagate_electrons: bool,
    /// Propagate hole deposits. Default: false.
    pub propagate_holes: bool,
    /// Drift as if no magnetic field were present. Default: false.
    pub ignore_magnetic_field: bool,
    /// Embedded Runge-Kutta pair. Default: Fehlberg.
    pub tableau: Tableau,
    /// Record sampled trajectories of every group. Default: false.
    pub output_trajectories: bool,
    /// Sampling interval of recorded trajectories. `None` = `timestep_max`.
    pub trajectory_step: Option<f64>,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            spatial_precision: 0.25 * NM,
            timestep_start: 0.01 * NS,
            timestep_min: 0.001 * NS,
            timestep_max: 0.5 * NS,
            integration_time: 25.0 * NS,
            charge_per_step: 10,
            max_charge_groups: 1000,
            temperature: 293.15,
            mobility_model: "jacoboni".to_string(),
            recombination_model: "none".to_string(),
            trapping_model: "none".to_string(),
            detrapping_model: "none".to_string(),
            multiplication_model: "none".to_string(),
            model_parameters: ModelParameters::default(),
            propagate_electrons: true,
            propagate_holes: false,
            ignore_magnetic_field: false,
            tableau: Tableau::Fehlberg,
            output_trajectories: false,
            trajectory_step: None,
        }
    }
}

impl PropagationConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("spatial_precision", self.spatial_precision)?;
        positive("timestep_start", self.timestep_start)?;
        positive("timestep_min", self.timestep_min)?;
        positive("timestep_max", self.timestep_max)?;
        positive("integration_time", self.integration_time)?;
        positive("temperature", self.temperature)?;
        if let Some(step) = self.trajectory_step {
            positive("trajectory_step", step)?;
        }
        if !(self.timestep_min <= self.timestep_start && self.timestep_start <= self.timestep_max) {
            return Err(ConfigError::InvalidTimesteps {
                min: self.timestep_min,
                start: self.timestep_start,
                max: self.timestep_max,
            });
        }
        if self.charge_per_step == 0 {
            return Err(ConfigError::ZeroChargePerStep);
        }
        if !self.propagate_electrons && !self.propagate_holes {
            return Err(ConfigError::NoCarrierSelected);
        }
        Ok(())
    }

    /// Resolved trajectory sampling interval.
    pub fn resolved_trajectory_step(&self) -> f64 {
        self.trajectory_step.unwrap_or(self.timestep_max)
    }
}

fn positive(option: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidOption { option, value })
    }
}

// ── PoolConfig ─────────────────────────────────────────────────────

/// Configuration for [`EventPool`](crate::EventPool).
#[derive(Clone, Debug, Default)]
pub struct PoolConfig {
    /// Run seed; each event draws from stream `event id` of this seed.
    pub seed: u64,
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism / 2`, clamped to `[1, 16]`).
    pub worker_count: Option<usize>,
}

impl PoolConfig {
    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(2);
                (cpus / 2).clamp(1, 16)
            }
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building the propagation module or its pool.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// A physical model could not be built.
    Model(ModelError),
    /// Neither electrons nor holes are propagated.
    NoCarrierSelected,
    /// A numeric option is NaN, infinite, zero, or negative.
    InvalidOption {
        /// Option name.
        option: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// Timestep bounds are not ordered `min <= start <= max`.
    InvalidTimesteps {
        /// Configured minimum.
        min: f64,
        /// Configured start value.
        start: f64,
        /// Configured maximum.
        max: f64,
    },
    /// `charge_per_step` is zero.
    ZeroChargePerStep,
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(e) => write!(f, "model: {e}"),
            Self::NoCarrierSelected => {
                write!(f, "not propagating any charge carrier type, enable electrons or holes")
            }
            Self::InvalidOption { option, value } => {
                write!(f, "{option} must be finite and positive, got {value}")
            }
            Self::InvalidTimesteps { min, start, max } => write!(
                f,
                "timesteps must satisfy min <= start <= max, got {min} / {start} / {max}"
            ),
            Self::ZeroChargePerStep => write!(f, "charge_per_step must be at least 1"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModelError> for ConfigError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

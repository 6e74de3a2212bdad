//! chargeprop: Monte-Carlo transport of charge carriers in semiconductor sensors.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! chargeprop sub-crates. For most users, adding `chargeprop` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use chargeprop::prelude::*;
//!
//! // 300 µm slab with a uniform 100 kV/cm field pointing to -z.
//! struct Slab;
//! impl SensorGeometry for Slab {
//!     fn is_within_sensor(&self, p: &Point3<f64>) -> bool { p.z.abs() <= 0.15 }
//!     fn sensor_intercept(&self, a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
//!         let face = 0.15f64.copysign(b.z);
//!         a + (b - a) * ((face - a.z) / (b.z - a.z))
//!     }
//!     fn sensor_center(&self) -> Point3<f64> { Point3::origin() }
//!     fn sensor_size(&self) -> Vector3<f64> { Vector3::new(10.0, 10.0, 0.3) }
//! }
//! struct Uniform;
//! impl FieldProvider for Uniform {
//!     fn electric_field(&self, _: &Point3<f64>) -> Vector3<f64> { Vector3::new(0.0, 0.0, -0.01) }
//!     fn magnetic_field(&self, _: &Point3<f64>) -> Vector3<f64> { Vector3::zeros() }
//!     fn doping_concentration(&self, _: &Point3<f64>) -> f64 { 0.0 }
//!     fn has_electric_field(&self) -> bool { true }
//!     fn has_magnetic_field(&self) -> bool { false }
//!     fn has_doping_profile(&self) -> bool { false }
//! }
//!
//! let module = ChargePropagation::new(
//!     PropagationConfig::default(),
//!     Arc::new(Uniform),
//!     Arc::new(Slab),
//! ).unwrap();
//! let deposits = vec![DepositedCharge::new(Point3::origin(), CarrierType::Electron, 100, 0.0)];
//!
//! let mut pool = EventPool::new(module, PoolConfig { seed: 42, worker_count: Some(2) }).unwrap();
//! let results = pool.run([(EventId(0), deposits)]);
//! let charges = &results[0].output.charges;
//! assert_eq!(charges.len(), 10);
//! assert!(charges.iter().all(|c| c.state == CarrierState::Halted));
//! let totals = pool.finish();
//! assert_eq!(totals.propagated_charge, 100);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `chargeprop-core` | Carrier types, charge records, units, collaborator traits |
//! | [`physics`] | `chargeprop-physics` | Mobility, recombination, trapping and multiplication models |
//! | [`engine`] | `chargeprop-engine` | Integrator, transport driver, per-event module and worker pool |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, units and IDs (`chargeprop-core`).
///
/// Contains the charge records, carrier enums, the [`types::units`] system
/// and the collaborator traits ([`types::FieldProvider`],
/// [`types::SensorGeometry`]).
pub use chargeprop_core as types;

/// Physical models (`chargeprop-physics`).
///
/// Every model family is an enum built from a selector string, e.g.
/// [`physics::Mobility::from_name`].
pub use chargeprop_physics as physics;

/// Transport engine (`chargeprop-engine`).
///
/// [`engine::ChargePropagation`] processes single events,
/// [`engine::EventPool`] runs many events on worker threads.
pub use chargeprop_engine as engine;

/// Common imports for typical chargeprop usage.
///
/// ```rust
/// use chargeprop::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use chargeprop_core::{
        CarrierState, CarrierType, DepositIndex, DepositedCharge, EventId, FieldProvider, Point3,
        PropagatedCharge, SensorGeometry, Vector3,
    };

    // Errors
    pub use chargeprop_core::ModelError;
    pub use chargeprop_engine::ConfigError;

    // Physics
    pub use chargeprop_physics::ModelParameters;

    // Engine
    pub use chargeprop_engine::{
        ChargePropagation, EventOutput, EventPool, EventResult, PoolConfig, PropagationConfig,
        RunStatistics, Tableau,
    };
}

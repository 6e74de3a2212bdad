//! Core types and traits for chargeprop carrier transport.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! fundamental abstractions used throughout the workspace: carrier types
//! and states, deposited and propagated charge records, the internal unit
//! system, model errors, and the collaborator traits through which field,
//! doping, and sensor geometry are queried.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod carrier;
pub mod charge;
pub mod error;
pub mod id;
pub mod traits;
pub mod units;

pub use carrier::{CarrierState, CarrierType};
pub use charge::{DepositedCharge, PropagatedCharge};
pub use error::{ModelError, ModelKind};
pub use id::{DepositIndex, EventId};
pub use traits::{FieldProvider, SensorGeometry};

pub use nalgebra::{Point3, Vector3};

//! Physical models for charge carrier transport in silicon.
//!
//! Each model family is a closed enum with a single `evaluate` entry point
//! and a `from_name` factory mapping a configuration selector to a variant.
//! Unknown selectors and unsuitable combinations fail at construction.
//!
//! | Family | Type | Selectors |
//! |--------|------|-----------|
//! | Mobility | [`Mobility`] | `jacoboni`, `canali`, `hamburg`, `masetti`, `arora`, `masetti_canali`, `constant` |
//! | Recombination | [`Recombination`] | `none`, `srh`, `auger`, `srh_auger`, `constant` |
//! | Trapping | [`Trapping`] | `none`, `constant`, `ljubljana`, `dortmund`, `cmstracker` |
//! | Detrapping | [`Detrapping`] | `none`, `constant` |
//! | Multiplication | [`ImpactIonization`] | `none`, `massey`, `overstraeten`, `okuto` |
//!
//! The [`velocity`] module combines a mobility with electric and magnetic
//! fields into a drift velocity.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod detrapping;
pub mod mobility;
pub mod multiplication;
pub mod parameters;
pub mod recombination;
pub mod trapping;
pub mod velocity;

pub use detrapping::Detrapping;
pub use mobility::Mobility;
pub use multiplication::ImpactIonization;
pub use parameters::{ModelParameters, PerCarrier};
pub use recombination::Recombination;
pub use trapping::Trapping;
pub use velocity::{drift_velocity, drift_velocity_in_magnetic_field, hall_factor};

/// Probability test shared by the lifetime-based models.
///
/// A carrier with lifetime `lifetime` survives a step of length `timestep`
/// with probability `exp(-timestep / lifetime)`; `draw` is uniform in [0, 1).
pub(crate) fn decays_within(draw: f64, timestep: f64, lifetime: f64) -> bool {
    draw < 1.0 - (-timestep / lifetime).exp()
}

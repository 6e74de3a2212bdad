//! Internal unit system.
//!
//! All quantities crossing crate boundaries are expressed in these base
//! units: millimetre, nanosecond, megavolt, megaelectronvolt, elementary
//! charge and kelvin. Electric fields are therefore in MV/mm, mobilities in
//! mm²/(MV·ns) and magnetic fields in MV·ns/mm².
//!
//! Multiply a literature value by the matching constant to convert it:
//!
//! ```
//! use chargeprop_core::units::{CM, V, S};
//!
//! // 1400 cm²/(V·s) electron mobility in internal units
//! let mobility = 1400.0 * CM * CM / (V * S);
//! assert!(mobility > 0.0);
//! ```

/// One millimetre (base length).
pub const MM: f64 = 1.0;
/// One centimetre.
pub const CM: f64 = 10.0 * MM;
/// One micrometre.
pub const UM: f64 = 1e-3 * MM;
/// One nanometre.
pub const NM: f64 = 1e-6 * MM;

/// One nanosecond (base time).
pub const NS: f64 = 1.0;
/// One picosecond.
pub const PS: f64 = 1e-3 * NS;
/// One second.
pub const S: f64 = 1e9 * NS;

/// One megavolt (base potential).
pub const MV: f64 = 1.0;
/// One kilovolt.
pub const KV: f64 = 1e-3 * MV;
/// One volt.
pub const V: f64 = 1e-6 * MV;

/// One megaelectronvolt (base energy).
pub const MEV: f64 = 1.0;
/// One electronvolt.
pub const EV: f64 = 1e-6 * MEV;

/// One kelvin (base temperature).
pub const K: f64 = 1.0;

/// One tesla, i.e. V·s/m².
pub const T: f64 = V * S / (1e3 * MM * 1e3 * MM);

/// One inverse cubic centimetre, for doping concentrations.
pub const PER_CM3: f64 = 1.0 / (CM * CM * CM);

/// One inverse square centimetre, for fluences.
pub const PER_CM2: f64 = 1.0 / (CM * CM);

/// Boltzmann constant in eV/K, expressed in internal units.
pub const BOLTZMANN_K: f64 = 8.617_333_3e-5 * EV / K;

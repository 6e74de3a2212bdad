//! Error types for physical model construction.
//!
//! Model selection happens once, when the propagation module is built.
//! Every failure here is fatal for that configuration; nothing in the
//! transport loop itself returns an error.

use std::error::Error;
use std::fmt;

/// The family a physical model belongs to, used in error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    /// Drift mobility.
    Mobility,
    /// Carrier recombination.
    Recombination,
    /// Carrier trapping.
    Trapping,
    /// Carrier detrapping.
    Detrapping,
    /// Impact ionization.
    Multiplication,
}

impl ModelKind {
    /// The configuration option that selects a model of this kind.
    pub fn option_name(self) -> &'static str {
        match self {
            Self::Mobility => "mobility_model",
            Self::Recombination => "recombination_model",
            Self::Trapping => "trapping_model",
            Self::Detrapping => "detrapping_model",
            Self::Multiplication => "multiplication_model",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mobility => write!(f, "mobility"),
            Self::Recombination => write!(f, "recombination"),
            Self::Trapping => write!(f, "trapping"),
            Self::Detrapping => write!(f, "detrapping"),
            Self::Multiplication => write!(f, "multiplication"),
        }
    }
}

/// Errors from selecting or constructing a physical model.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// The selector string names no known model.
    UnknownModel {
        /// Model family being selected.
        kind: ModelKind,
        /// The unrecognized selector.
        name: String,
    },
    /// The model cannot be used with the available inputs, e.g. a
    /// doping-dependent model without a doping profile.
    Unsuitable {
        /// Name of the rejected model.
        model: String,
        /// Why it is unsuitable.
        reason: String,
    },
    /// A parameter the model requires was not provided.
    MissingParameter {
        /// Name of the model.
        model: String,
        /// Name of the missing parameter.
        parameter: &'static str,
    },
    /// A parameter has a value outside its valid range.
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownModel { kind, name } => {
                write!(f, "unknown {kind} model '{name}' for option '{}'", kind.option_name())
            }
            Self::Unsuitable { model, reason } => {
                write!(f, "model '{model}' is unsuitable: {reason}")
            }
            Self::MissingParameter { model, parameter } => {
                write!(f, "model '{model}' requires parameter '{parameter}'")
            }
            Self::InvalidParameter { parameter, value } => {
                write!(f, "parameter '{parameter}' has invalid value {value}")
            }
        }
    }
}

impl Error for ModelError {}

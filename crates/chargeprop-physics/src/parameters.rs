//! Model parameters beyond the model selectors.
//!
//! Most models are fully parameterized from the literature and only need
//! the temperature. The `constant` variants and the fluence-dependent
//! trapping models need extra values, which are optional here and checked
//! by the model factories.

use chargeprop_core::{CarrierType, ModelError};

/// A value that differs between electrons and holes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerCarrier<T> {
    /// Value for electrons.
    pub electron: T,
    /// Value for holes.
    pub hole: T,
}

impl<T: Copy> PerCarrier<T> {
    /// Pair up an electron and a hole value.
    pub fn new(electron: T, hole: T) -> Self {
        Self { electron, hole }
    }

    /// The value for `carrier`.
    pub fn get(&self, carrier: CarrierType) -> T {
        match carrier {
            CarrierType::Electron => self.electron,
            CarrierType::Hole => self.hole,
        }
    }

    /// Apply `f` to both values.
    pub fn map<U: Copy>(self, mut f: impl FnMut(T) -> U) -> PerCarrier<U> {
        PerCarrier {
            electron: f(self.electron),
            hole: f(self.hole),
        }
    }
}

/// Optional parameters consumed by specific models, in internal units.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelParameters {
    /// Mobility for the `constant` mobility model (electrons).
    pub mobility_electron: Option<f64>,
    /// Mobility for the `constant` mobility model (holes).
    pub mobility_hole: Option<f64>,
    /// Lifetime for the `constant` recombination model (electrons).
    pub lifetime_electron: Option<f64>,
    /// Lifetime for the `constant` recombination model (holes).
    pub lifetime_hole: Option<f64>,
    /// Effective trapping time for the `constant` trapping model (electrons).
    pub trapping_time_electron: Option<f64>,
    /// Effective trapping time for the `constant` trapping model (holes).
    pub trapping_time_hole: Option<f64>,
    /// Mean detrapping time for the `constant` detrapping model (electrons).
    pub detrapping_time_electron: Option<f64>,
    /// Mean detrapping time for the `constant` detrapping model (holes).
    pub detrapping_time_hole: Option<f64>,
    /// 1 MeV neutron-equivalent fluence for radiation-damage trapping models.
    pub fluence: Option<f64>,
    /// Field magnitude below which impact ionization is not evaluated.
    /// Default: 1e-2 MV/mm (100 kV/cm).
    pub multiplication_threshold: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            mobility_electron: None,
            mobility_hole: None,
            lifetime_electron: None,
            lifetime_hole: None,
            trapping_time_electron: None,
            trapping_time_hole: None,
            detrapping_time_electron: None,
            detrapping_time_hole: None,
            fluence: None,
            multiplication_threshold: 1e-2,
        }
    }
}

/// Fetch a required parameter or report which model needed it.
pub(crate) fn require(
    model: &str,
    parameter: &'static str,
    value: Option<f64>,
) -> Result<f64, ModelError> {
    let value = value.ok_or_else(|| ModelError::MissingParameter {
        model: model.to_string(),
        parameter,
    })?;
    if !value.is_finite() {
        return Err(ModelError::InvalidParameter { parameter, value });
    }
    Ok(value)
}

/// Fetch a required, strictly positive parameter.
pub(crate) fn require_positive(
    model: &str,
    parameter: &'static str,
    value: Option<f64>,
) -> Result<f64, ModelError> {
    let value = require(model, parameter, value)?;
    if value <= 0.0 {
        return Err(ModelError::InvalidParameter { parameter, value });
    }
    Ok(value)
}

/// Fail unless a doping profile is available.
pub(crate) fn require_doping(model: &str, has_doping: bool) -> Result<(), ModelError> {
    if has_doping {
        Ok(())
    } else {
        Err(ModelError::Unsuitable {
            model: model.to_string(),
            reason: "no doping profile available".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_carrier_lookup() {
        let p = PerCarrier::new(1.0, 2.0);
        assert_eq!(p.get(CarrierType::Electron), 1.0);
        assert_eq!(p.get(CarrierType::Hole), 2.0);
        let doubled = p.map(|v| v * 2.0);
        assert_eq!(doubled.hole, 4.0);
    }

    #[test]
    fn require_reports_missing() {
        let err = require("constant", "lifetime_electron", None).unwrap_err();
        assert_eq!(
            err,
            ModelError::MissingParameter {
                model: "constant".into(),
                parameter: "lifetime_electron",
            }
        );
    }

    #[test]
    fn require_positive_rejects_zero_and_nan() {
        assert!(require_positive("m", "p", Some(0.0)).is_err());
        assert!(require_positive("m", "p", Some(f64::NAN)).is_err());
        assert_eq!(require_positive("m", "p", Some(3.0)).unwrap(), 3.0);
    }

    #[test]
    fn require_doping_needs_profile() {
        assert!(require_doping("masetti", true).is_ok());
        assert!(matches!(
            require_doping("masetti", false),
            Err(ModelError::Unsuitable { .. })
        ));
    }

    #[test]
    fn default_threshold() {
        assert_eq!(ModelParameters::default().multiplication_threshold, 1e-2);
    }
}

//! Detrapping models: how long a trapped carrier stays captured.

use chargeprop_core::{CarrierType, ModelError, ModelKind};

use crate::parameters::{require_positive, ModelParameters, PerCarrier};

/// Detrapping model selected by `detrapping_model`.
#[derive(Clone, Debug, PartialEq)]
pub enum Detrapping {
    /// Trapped carriers are never released.
    None,
    /// Exponentially distributed release time with a fixed mean per carrier.
    Constant(PerCarrier<f64>),
}

impl Detrapping {
    /// Build the model named by `name`.
    pub fn from_name(name: &str, params: &ModelParameters) -> Result<Self, ModelError> {
        let model = match name {
            "none" => Self::None,
            "constant" => Self::Constant(PerCarrier::new(
                require_positive(name, "detrapping_time_electron", params.detrapping_time_electron)?,
                require_positive(name, "detrapping_time_hole", params.detrapping_time_hole)?,
            )),
            _ => {
                return Err(ModelError::UnknownModel {
                    kind: ModelKind::Detrapping,
                    name: name.to_string(),
                })
            }
        };
        log::info!("Selected detrapping model \"{name}\"");
        Ok(model)
    }

    /// Time until a trapped `carrier` is released.
    ///
    /// `draw` is a uniform sample in [0, 1). Returns infinity when the
    /// carrier is never released.
    pub fn evaluate(&self, carrier: CarrierType, draw: f64, _efield: f64) -> f64 {
        match self {
            Self::None => f64::INFINITY,
            Self::Constant(mean) => -(1.0 - draw).ln() * mean.get(carrier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_never_releases() {
        let m = Detrapping::from_name("none", &ModelParameters::default()).unwrap();
        assert!(m.evaluate(CarrierType::Electron, 0.3, 0.0).is_infinite());
    }

    #[test]
    fn constant_inverts_exponential_cdf() {
        let params = ModelParameters {
            detrapping_time_electron: Some(2.0),
            detrapping_time_hole: Some(4.0),
            ..Default::default()
        };
        let m = Detrapping::from_name("constant", &params).unwrap();
        assert_eq!(m.evaluate(CarrierType::Electron, 0.0, 0.0), 0.0);
        let half = m.evaluate(CarrierType::Hole, 0.5, 0.0);
        assert!((half - 4.0 * std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn constant_requires_times() {
        let err = Detrapping::from_name("constant", &ModelParameters::default()).unwrap_err();
        assert!(matches!(err, ModelError::MissingParameter { .. }));
    }

    #[test]
    fn unknown_model_rejected() {
        assert!(Detrapping::from_name("thermal", &ModelParameters::default()).is_err());
    }
}

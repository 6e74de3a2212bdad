//! Impact ionization: charge multiplication in high fields.
//!
//! Every model provides an ionization coefficient `alpha(E, T)` per carrier
//! type. The per-step gain is `exp(alpha * step_length)` above the
//! configured field threshold and exactly 1 below it.
//!
//! References:
//! - Massey et al., IEEE Trans. Electron Devices 53 (2006) 2328
//! - Van Overstraeten & De Man, Solid-State Electronics 13 (1970) 583
//! - Okuto & Crowell, Solid-State Electronics 18 (1975) 161

use chargeprop_core::units::{BOLTZMANN_K, CM, EV, V};
use chargeprop_core::{CarrierType, ModelError, ModelKind};

use crate::parameters::{ModelParameters, PerCarrier};

/// Multiplication model selected by `multiplication_model`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImpactIonization {
    model: IonizationModel,
    threshold: f64,
}

/// Ionization coefficient parameterization.
#[derive(Clone, Debug, PartialEq)]
pub enum IonizationModel {
    /// No multiplication.
    None,
    /// `alpha = A exp(-B(T) / E)`.
    Massey(Massey),
    /// `alpha = gamma A exp(-gamma B / E)` with a two-branch hole fit.
    VanOverstraeten(VanOverstraeten),
    /// `alpha = a(T) E exp(-(b(T) / E)^2)`.
    OkutoCrowell(OkutoCrowell),
}

impl ImpactIonization {
    /// Build the model named by `name` for the given temperature.
    pub fn from_name(
        name: &str,
        temperature: f64,
        params: &ModelParameters,
    ) -> Result<Self, ModelError> {
        let model = match name {
            "none" => IonizationModel::None,
            "massey" => IonizationModel::Massey(Massey::new(temperature)),
            "overstraeten" | "vanoverstraeten" => {
                IonizationModel::VanOverstraeten(VanOverstraeten::new(temperature))
            }
            "okuto" | "okutocrowell" => IonizationModel::OkutoCrowell(OkutoCrowell::new(temperature)),
            _ => {
                return Err(ModelError::UnknownModel {
                    kind: ModelKind::Multiplication,
                    name: name.to_string(),
                })
            }
        };
        let threshold = params.multiplication_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ModelError::InvalidParameter {
                parameter: "multiplication_threshold",
                value: threshold,
            });
        }
        log::info!("Selected impact ionization model \"{name}\"");
        Ok(Self { model, threshold })
    }

    /// Whether the model can produce a gain other than 1.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.model, IonizationModel::None)
    }

    /// Field magnitude below which the gain is 1.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Ionization coefficient of `carrier` at field magnitude `efield`,
    /// ignoring the threshold.
    pub fn coefficient(&self, carrier: CarrierType, efield: f64) -> f64 {
        match &self.model {
            IonizationModel::None => 0.0,
            IonizationModel::Massey(m) => m.coefficient(carrier, efield),
            IonizationModel::VanOverstraeten(m) => m.coefficient(carrier, efield),
            IonizationModel::OkutoCrowell(m) => m.coefficient(carrier, efield),
        }
    }

    /// Gain factor for a step of length `step_length` at mean field `efield`.
    pub fn evaluate(&self, carrier: CarrierType, efield: f64, step_length: f64) -> f64 {
        if !self.is_enabled() || efield < self.threshold {
            return 1.0;
        }
        (self.coefficient(carrier, efield) * step_length).exp()
    }
}

/// Massey model parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Massey {
    a: PerCarrier<f64>,
    b: PerCarrier<f64>,
}

impl Massey {
    fn new(temperature: f64) -> Self {
        Self {
            a: PerCarrier::new(4.43e5 / CM, 1.13e6 / CM),
            b: PerCarrier::new(
                (9.66e5 + 4.99e2 * temperature) * V / CM,
                (1.71e6 + 1.09e3 * temperature) * V / CM,
            ),
        }
    }

    fn coefficient(&self, carrier: CarrierType, efield: f64) -> f64 {
        self.a.get(carrier) * (-self.b.get(carrier) / efield).exp()
    }
}

/// Van Overstraeten–De Man model parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct VanOverstraeten {
    gamma: f64,
    electron: (f64, f64),
    hole_low: (f64, f64),
    hole_high: (f64, f64),
    hole_switch: f64,
}

impl VanOverstraeten {
    fn new(temperature: f64) -> Self {
        let phonon = 0.063 * EV;
        let gamma = (phonon / (2.0 * BOLTZMANN_K * 300.0)).tanh()
            / (phonon / (2.0 * BOLTZMANN_K * temperature)).tanh();
        Self {
            gamma,
            electron: (7.03e5 / CM, 1.231e6 * V / CM),
            hole_low: (1.582e6 / CM, 2.036e6 * V / CM),
            hole_high: (6.71e5 / CM, 1.693e6 * V / CM),
            hole_switch: 4e5 * V / CM,
        }
    }

    fn coefficient(&self, carrier: CarrierType, efield: f64) -> f64 {
        let (a, b) = match carrier {
            CarrierType::Electron => self.electron,
            CarrierType::Hole if efield < self.hole_switch => self.hole_low,
            CarrierType::Hole => self.hole_high,
        };
        self.gamma * a * (-self.gamma * b / efield).exp()
    }
}

/// Okuto–Crowell model parameters, temperature terms folded in.
#[derive(Clone, Debug, PartialEq)]
pub struct OkutoCrowell {
    a: PerCarrier<f64>,
    b: PerCarrier<f64>,
}

impl OkutoCrowell {
    fn new(temperature: f64) -> Self {
        let dt = temperature - 300.0;
        Self {
            a: PerCarrier::new(0.426 / V * (1.0 + 3.05e-4 * dt), 0.243 / V * (1.0 + 5.35e-4 * dt)),
            b: PerCarrier::new(
                4.81e5 * V / CM * (1.0 + 6.86e-4 * dt),
                6.53e5 * V / CM * (1.0 + 5.67e-4 * dt),
            ),
        }
    }

    fn coefficient(&self, carrier: CarrierType, efield: f64) -> f64 {
        let ratio = self.b.get(carrier) / efield;
        self.a.get(carrier) * efield * (-ratio * ratio).exp()
    }
}

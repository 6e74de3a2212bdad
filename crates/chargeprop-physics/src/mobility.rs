//! Charge carrier mobility models for silicon.
//!
//! Field-dependent models (`jacoboni`, `canali`, `hamburg`) ignore doping.
//! Doping-dependent models (`masetti`, `arora`, `masetti_canali`) require a
//! doping profile and fail construction without one.
//!
//! References:
//! - Jacoboni et al., Solid-State Electronics 20 (1977) 77
//! - Canali et al., IEEE Trans. Electron Devices 22 (1975) 1045
//! - Becker et al. (Hamburg), NIM A 624 (2010) 716
//! - Masetti et al., IEEE Trans. Electron Devices 30 (1983) 764
//! - Arora et al., IEEE Trans. Electron Devices 29 (1982) 292

use chargeprop_core::units::{CM, PER_CM3, S, V};
use chargeprop_core::{CarrierType, ModelError, ModelKind};

use crate::parameters::{require_doping, require_positive, ModelParameters, PerCarrier};

/// Drift mobility as a function of field magnitude and doping.
#[derive(Clone, Debug, PartialEq)]
pub enum Mobility {
    /// Jacoboni–Canali saturation model (`jacoboni` and `canali`).
    JacoboniCanali(JacoboniCanali),
    /// Hamburg model fitted to <100> silicon.
    Hamburg(Hamburg),
    /// Doping-dependent low-field mobility after Masetti.
    Masetti(Masetti),
    /// Doping-dependent low-field mobility after Arora.
    Arora(Arora),
    /// Masetti low-field mobility saturated with the Canali field term.
    MasettiCanali(MasettiCanali),
    /// Field- and doping-independent mobility.
    Constant(PerCarrier<f64>),
}

impl Mobility {
    /// Build the model named by `name` for the given temperature.
    ///
    /// `has_doping` reports whether a doping profile is available.
    pub fn from_name(
        name: &str,
        temperature: f64,
        params: &ModelParameters,
        has_doping: bool,
    ) -> Result<Self, ModelError> {
        let model = match name {
            "jacoboni" => Self::JacoboniCanali(JacoboniCanali::jacoboni(temperature)),
            "canali" => Self::JacoboniCanali(JacoboniCanali::canali(temperature)),
            "hamburg" => Self::Hamburg(Hamburg::new(temperature)),
            "masetti" => {
                require_doping(name, has_doping)?;
                Self::Masetti(Masetti::new(temperature))
            }
            "arora" => {
                require_doping(name, has_doping)?;
                Self::Arora(Arora::new(temperature))
            }
            "masetti_canali" => {
                require_doping(name, has_doping)?;
                Self::MasettiCanali(MasettiCanali::new(temperature))
            }
            "constant" => Self::Constant(PerCarrier::new(
                require_positive(name, "mobility_electron", params.mobility_electron)?,
                require_positive(name, "mobility_hole", params.mobility_hole)?,
            )),
            _ => {
                return Err(ModelError::UnknownModel {
                    kind: ModelKind::Mobility,
                    name: name.to_string(),
                })
            }
        };
        log::info!("Selected mobility model \"{name}\"");
        Ok(model)
    }

    /// Mobility of `carrier` at field magnitude `efield` and doping `doping`.
    pub fn evaluate(&self, carrier: CarrierType, efield: f64, doping: f64) -> f64 {
        match self {
            Self::JacoboniCanali(m) => m.evaluate(carrier, efield),
            Self::Hamburg(m) => m.evaluate(carrier, efield),
            Self::Masetti(m) => m.evaluate(carrier, doping),
            Self::Arora(m) => m.evaluate(carrier, doping),
            Self::MasettiCanali(m) => m.evaluate(carrier, efield, doping),
            Self::Constant(mobility) => mobility.get(carrier),
        }
    }

    /// Whether the model reads the doping concentration.
    pub fn is_doping_dependent(&self) -> bool {
        matches!(self, Self::Masetti(_) | Self::Arora(_) | Self::MasettiCanali(_))
    }
}

/// `mu(E) = (v_m / E_c) / (1 + (E / E_c)^beta)^(1 / beta)`
#[derive(Clone, Debug, PartialEq)]
pub struct JacoboniCanali {
    saturation_velocity: PerCarrier<f64>,
    critical_field: PerCarrier<f64>,
    beta: PerCarrier<f64>,
}

impl JacoboniCanali {
    /// Parameters from Jacoboni et al.
    pub fn jacoboni(temperature: f64) -> Self {
        Self::with_electron_velocity(temperature, 1.53e9)
    }

    /// Parameters from Canali et al.; lower electron saturation velocity.
    pub fn canali(temperature: f64) -> Self {
        Self::with_electron_velocity(temperature, 1.43e9)
    }

    fn with_electron_velocity(t: f64, electron_vm: f64) -> Self {
        Self {
            saturation_velocity: PerCarrier::new(
                electron_vm * CM / S * t.powf(-0.87),
                1.62e8 * CM / S * t.powf(-0.52),
            ),
            critical_field: PerCarrier::new(
                1.01 * V / CM * t.powf(1.55),
                1.24 * V / CM * t.powf(1.68),
            ),
            beta: PerCarrier::new(2.57e-2 * t.powf(0.66), 0.46 * t.powf(0.17)),
        }
    }

    fn evaluate(&self, carrier: CarrierType, efield: f64) -> f64 {
        let vm = self.saturation_velocity.get(carrier);
        let ec = self.critical_field.get(carrier);
        let beta = self.beta.get(carrier);
        vm / ec / (1.0 + (efield / ec).powf(beta)).powf(1.0 / beta)
    }
}

/// Hamburg parameterization.
///
/// Electrons: `1/mu = 1/mu0 + E/v_sat`. Holes: constant `mu0` below `E0`,
/// `1/mu = 1/mu0 + b (E - E0) + c (E - E0)^2` above.
#[derive(Clone, Debug, PartialEq)]
pub struct Hamburg {
    electron_mu0: f64,
    electron_vsat: f64,
    hole_mu0: f64,
    hole_b: f64,
    hole_c: f64,
    hole_e0: f64,
}

impl Hamburg {
    /// Parameters at `temperature`.
    pub fn new(temperature: f64) -> Self {
        let tn = temperature / 300.0;
        Self {
            electron_mu0: 1530.0 * CM * CM / (V * S) * tn.powf(-2.42),
            electron_vsat: 1.03e7 * CM / S * tn.powf(-0.226),
            hole_mu0: 464.0 * CM * CM / (V * S) * tn.powf(-2.20),
            hole_b: 9.57e-8 * S / CM * tn.powf(-0.101),
            hole_c: -3.31e-13 * S / V,
            hole_e0: 2640.0 * V / CM * tn.powf(0.526),
        }
    }

    fn evaluate(&self, carrier: CarrierType, efield: f64) -> f64 {
        match carrier {
            CarrierType::Electron => 1.0 / (1.0 / self.electron_mu0 + efield / self.electron_vsat),
            CarrierType::Hole => {
                if efield < self.hole_e0 {
                    self.hole_mu0
                } else {
                    let excess = efield - self.hole_e0;
                    1.0 / (1.0 / self.hole_mu0 + self.hole_b * excess + self.hole_c * excess * excess)
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct MasettiCoefficients {
    mu_min1: f64,
    mu_min2: f64,
    mu1: f64,
    pc: f64,
    cr: f64,
    cs: f64,
    alpha: f64,
    beta: f64,
    mu_max: f64,
}

impl MasettiCoefficients {
    fn evaluate(&self, doping: f64) -> f64 {
        let n = doping.abs();
        if n == 0.0 {
            return self.mu_max;
        }
        let floor = if self.pc > 0.0 {
            self.mu_min1 * (-self.pc / n).exp()
        } else {
            self.mu_min1
        };
        floor + (self.mu_max - self.mu_min2) / (1.0 + (n / self.cr).powf(self.alpha))
            - self.mu1 / (1.0 + (self.cs / n).powf(self.beta))
    }
}

/// Masetti doping-dependent low-field mobility.
///
/// Electron coefficients are those for arsenic, hole coefficients those
/// for boron.
#[derive(Clone, Debug, PartialEq)]
pub struct Masetti {
    coefficients: PerCarrier<MasettiCoefficients>,
}

impl Masetti {
    /// Parameters at `temperature`; only the lattice mobility is scaled.
    pub fn new(temperature: f64) -> Self {
        let mobility = CM * CM / (V * S);
        let tn = temperature / 300.0;
        Self {
            coefficients: PerCarrier::new(
                MasettiCoefficients {
                    mu_min1: 52.2 * mobility,
                    mu_min2: 52.2 * mobility,
                    mu1: 43.4 * mobility,
                    pc: 0.0,
                    cr: 9.68e16 * PER_CM3,
                    cs: 3.43e20 * PER_CM3,
                    alpha: 0.680,
                    beta: 2.0,
                    mu_max: 1414.0 * mobility * tn.powf(-2.5),
                },
                MasettiCoefficients {
                    mu_min1: 44.9 * mobility,
                    mu_min2: 0.0,
                    mu1: 29.0 * mobility,
                    pc: 9.23e16 * PER_CM3,
                    cr: 2.23e17 * PER_CM3,
                    cs: 6.10e20 * PER_CM3,
                    alpha: 0.719,
                    beta: 2.0,
                    mu_max: 470.5 * mobility * tn.powf(-2.2),
                },
            ),
        }
    }

    fn evaluate(&self, carrier: CarrierType, doping: f64) -> f64 {
        self.coefficients.get(carrier).evaluate(doping)
    }
}

/// Arora doping-dependent low-field mobility:
/// `mu = mu_min + mu_0 / (1 + (N / N_ref)^alpha)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Arora {
    mu_min: PerCarrier<f64>,
    mu_0: PerCarrier<f64>,
    n_ref: PerCarrier<f64>,
    alpha: f64,
}

impl Arora {
    /// Parameters at `temperature`.
    pub fn new(temperature: f64) -> Self {
        let mobility = CM * CM / (V * S);
        let tn = temperature / 300.0;
        Self {
            mu_min: PerCarrier::new(88.0 * tn.powf(-0.57), 54.3 * tn.powf(-0.57)).map(|m| m * mobility),
            mu_0: PerCarrier::new(
                7.4e8 * temperature.powf(-2.33),
                1.36e8 * temperature.powf(-2.23),
            )
            .map(|m| m * mobility),
            n_ref: PerCarrier::new(1.26e17, 2.35e17).map(|n| n * PER_CM3 * tn.powf(2.4)),
            alpha: 0.88 * tn.powf(-0.146),
        }
    }

    fn evaluate(&self, carrier: CarrierType, doping: f64) -> f64 {
        self.mu_min.get(carrier)
            + self.mu_0.get(carrier) / (1.0 + (doping.abs() / self.n_ref.get(carrier)).powf(self.alpha))
    }
}

/// Masetti low-field mobility extended to high fields with Canali's
/// saturation term: `mu = mu_m / (1 + (mu_m E / v_sat)^beta)^(1 / beta)`.
#[derive(Clone, Debug, PartialEq)]
pub struct MasettiCanali {
    low_field: Masetti,
    saturation_velocity: PerCarrier<f64>,
    beta: PerCarrier<f64>,
}

impl MasettiCanali {
    /// Parameters at `temperature`.
    pub fn new(temperature: f64) -> Self {
        let canali = JacoboniCanali::canali(temperature);
        Self {
            low_field: Masetti::new(temperature),
            saturation_velocity: canali.saturation_velocity,
            beta: canali.beta,
        }
    }

    fn evaluate(&self, carrier: CarrierType, efield: f64, doping: f64) -> f64 {
        let low = self.low_field.evaluate(carrier, doping);
        let beta = self.beta.get(carrier);
        let ratio = low * efield / self.saturation_velocity.get(carrier);
        low / (1.0 + ratio.powf(beta)).powf(1.0 / beta)
    }
}

//! Charge carrier recombination models.
//!
//! Every model answers one question per step: given a uniform draw, did
//! the carrier recombine within `timestep`? Lifetimes convert to a decay
//! probability `1 - exp(-timestep / lifetime)`.
//!
//! References:
//! - SRH lifetimes: Fossum & Lee, Solid-State Electronics 25 (1982) 741;
//!   temperature scaling after Klaassen, Solid-State Electronics 35 (1992) 1594
//! - Auger coefficient: Dziewior & Schmid, Appl. Phys. Lett. 31 (1977) 346

use chargeprop_core::units::{CM, PER_CM3, S};
use chargeprop_core::{CarrierType, ModelError, ModelKind};

use crate::decays_within;
use crate::parameters::{require_doping, require_positive, ModelParameters, PerCarrier};

/// Recombination model selected by `recombination_model`.
#[derive(Clone, Debug, PartialEq)]
pub enum Recombination {
    /// Carriers never recombine.
    None,
    /// Shockley–Read–Hall recombination with doping-dependent lifetime.
    ShockleyReadHall(ShockleyReadHall),
    /// Auger recombination of minority carriers.
    Auger(Auger),
    /// SRH and Auger combined for minority carriers, SRH alone otherwise.
    ShockleyReadHallAuger(ShockleyReadHallAuger),
    /// Fixed lifetimes per carrier type.
    ConstantLifetime(PerCarrier<f64>),
}

impl Recombination {
    /// Build the model named by `name`.
    pub fn from_name(
        name: &str,
        temperature: f64,
        params: &ModelParameters,
        has_doping: bool,
    ) -> Result<Self, ModelError> {
        let model = match name {
            "none" => {
                log::info!(
                    "No charge carrier recombination model chosen, finite lifetime not simulated"
                );
                Self::None
            }
            "srh" => Self::ShockleyReadHall(ShockleyReadHall::new(name, temperature, has_doping)?),
            "auger" => Self::Auger(Auger::new(name, has_doping)?),
            "srh_auger" | "combined" => Self::ShockleyReadHallAuger(ShockleyReadHallAuger {
                srh: ShockleyReadHall::new(name, temperature, has_doping)?,
                auger: Auger::new(name, has_doping)?,
            }),
            "constant" => Self::ConstantLifetime(PerCarrier::new(
                require_positive(name, "lifetime_electron", params.lifetime_electron)?,
                require_positive(name, "lifetime_hole", params.lifetime_hole)?,
            )),
            _ => {
                return Err(ModelError::UnknownModel {
                    kind: ModelKind::Recombination,
                    name: name.to_string(),
                })
            }
        };
        log::info!("Selected recombination model \"{name}\"");
        Ok(model)
    }

    /// Whether `carrier` recombined during `timestep`.
    ///
    /// `survival_draw` is a uniform sample in [0, 1).
    pub fn evaluate(
        &self,
        carrier: CarrierType,
        doping: f64,
        survival_draw: f64,
        timestep: f64,
    ) -> bool {
        match self {
            Self::None => false,
            Self::ShockleyReadHall(srh) => {
                decays_within(survival_draw, timestep, srh.lifetime(carrier, doping))
            }
            Self::Auger(auger) => {
                minority_carrier(doping) == carrier
                    && decays_within(survival_draw, timestep, auger.lifetime(doping))
            }
            Self::ShockleyReadHallAuger(combined) => {
                decays_within(survival_draw, timestep, combined.lifetime(carrier, doping))
            }
            Self::ConstantLifetime(lifetime) => {
                decays_within(survival_draw, timestep, lifetime.get(carrier))
            }
        }
    }
}

/// Minority carrier type for a doping concentration: holes in n-type
/// (positive) material, electrons otherwise.
fn minority_carrier(doping: f64) -> CarrierType {
    if doping > 0.0 {
        CarrierType::Hole
    } else {
        CarrierType::Electron
    }
}

/// Shockley–Read–Hall lifetime
/// `tau = tau_ref / (1 + |N| / N_ref) * (300 / T)^1.5`.
#[derive(Clone, Debug, PartialEq)]
pub struct ShockleyReadHall {
    lifetime_reference: PerCarrier<f64>,
    doping_reference: PerCarrier<f64>,
    temperature_scaling: f64,
}

impl ShockleyReadHall {
    fn new(model: &str, temperature: f64, has_doping: bool) -> Result<Self, ModelError> {
        require_doping(model, has_doping)?;
        Ok(Self {
            lifetime_reference: PerCarrier::new(1e-5 * S, 4.0e-4 * S),
            doping_reference: PerCarrier::new(1e16 * PER_CM3, 7.1e15 * PER_CM3),
            temperature_scaling: (300.0 / temperature).powf(1.5),
        })
    }

    /// Lifetime of `carrier` at doping `doping`.
    pub fn lifetime(&self, carrier: CarrierType, doping: f64) -> f64 {
        self.lifetime_reference.get(carrier)
            / (1.0 + doping.abs() / self.doping_reference.get(carrier))
            * self.temperature_scaling
    }
}

/// Auger lifetime `tau = 1 / (C N^2)`, applied to minority carriers only.
#[derive(Clone, Debug, PartialEq)]
pub struct Auger {
    coefficient: f64,
}

impl Auger {
    fn new(model: &str, has_doping: bool) -> Result<Self, ModelError> {
        require_doping(model, has_doping)?;
        Ok(Self {
            coefficient: 3.8e-31 * CM.powi(6) / S,
        })
    }

    /// Auger lifetime at doping `doping`.
    pub fn lifetime(&self, doping: f64) -> f64 {
        1.0 / (self.coefficient * doping * doping)
    }
}

/// Combination of [`ShockleyReadHall`] and [`Auger`].
///
/// Minority carriers see the harmonic combination of both lifetimes,
/// majority carriers only the SRH lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct ShockleyReadHallAuger {
    srh: ShockleyReadHall,
    auger: Auger,
}

impl ShockleyReadHallAuger {
    /// Effective lifetime of `carrier` at doping `doping`.
    pub fn lifetime(&self, carrier: CarrierType, doping: f64) -> f64 {
        let srh = self.srh.lifetime(carrier, doping);
        if minority_carrier(doping) != carrier {
            return srh;
        }
        1.0 / (1.0 / srh + 1.0 / self.auger.lifetime(doping))
    }
}

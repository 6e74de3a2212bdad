//! Per-event charge propagation.
//!
//! [`ChargePropagation`] owns the configuration, the physical models and
//! shared handles to the field provider and sensor geometry. Construction
//! validates the configuration, builds every model and logs startup
//! warnings; [`run_event`](ChargePropagation::run_event) then turns the
//! deposits of one event into propagated charges.

use std::sync::Arc;

use chargeprop_core::units::PS;
use chargeprop_core::{
    CarrierState, CarrierType, DepositIndex, DepositedCharge, FieldProvider, Point3,
    PropagatedCharge, SensorGeometry,
};
use rand::Rng;

use crate::batcher::{ChargeGroups, GroupPlan};
use crate::config::{ConfigError, PropagationConfig};
use crate::driver::{PhysicsModels, Transport};
use crate::statistics::{EventSummary, RunStatistics};
use crate::trajectory::{Trajectory, TrajectoryRecorder};

/// Everything produced for one event.
#[derive(Clone, Debug, Default)]
pub struct EventOutput {
    /// One entry per charge group, in deposit then group order.
    pub charges: Vec<PropagatedCharge>,
    /// Recorded trajectories, when enabled.
    pub trajectories: Option<Vec<Trajectory>>,
    /// Event totals.
    pub summary: EventSummary,
}

/// Charge propagation module for one sensor.
pub struct ChargePropagation {
    config: PropagationConfig,
    models: PhysicsModels,
    field: Arc<dyn FieldProvider>,
    geometry: Arc<dyn SensorGeometry>,
}

impl ChargePropagation {
    /// Validate `config`, build its models and check the sensor setup.
    pub fn new(
        config: PropagationConfig,
        field: Arc<dyn FieldProvider>,
        geometry: Arc<dyn SensorGeometry>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let models = PhysicsModels::from_config(&config, field.has_doping_profile())?;

        if !field.has_electric_field() {
            log::warn!("This detector does not have an electric field.");
        } else {
            check_collected_carrier(&config, field.as_ref(), geometry.as_ref());
        }

        if field.has_magnetic_field() {
            if config.ignore_magnetic_field {
                log::warn!(
                    "A magnetic field is switched on, but is set to be ignored for this module."
                );
            } else {
                log::debug!("This detector sees a magnetic field.");
            }
        }

        if models.multiplication.is_enabled() && config.timestep_max > 1.0 * PS {
            log::warn!(
                "Charge multiplication enabled with maximum timestep larger than 1ps. This might lead to unphysical gain values."
            );
        }

        Ok(Self {
            config,
            models,
            field,
            geometry,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    /// Whether `carrier` deposits are propagated.
    pub fn propagates(&self, carrier: CarrierType) -> bool {
        match carrier {
            CarrierType::Electron => self.config.propagate_electrons,
            CarrierType::Hole => self.config.propagate_holes,
        }
    }

    /// Propagate all deposits of one event.
    ///
    /// `rng` must be the event's own generator; draws are consumed in
    /// deposit order, then group order. The event totals are logged and
    /// folded into `statistics`.
    pub fn run_event<R: Rng + ?Sized>(
        &self,
        deposits: &[DepositedCharge],
        rng: &mut R,
        statistics: &RunStatistics,
    ) -> EventOutput {
        let config = &self.config;
        let transport = Transport::new(
            config,
            &self.models,
            self.field.as_ref(),
            self.geometry.as_ref(),
        );
        let mut charges = Vec::new();
        let mut trajectories = config.output_trajectories.then(Vec::new);
        let mut summary = EventSummary::default();

        log::trace!("Propagating charges in sensor");
        for (index, deposit) in deposits.iter().enumerate() {
            if !self.propagates(deposit.carrier) {
                log::debug!(
                    "Skipping charge carriers ({}) on {}",
                    deposit.carrier,
                    deposit.local_position
                );
                summary.skipped_deposits += 1;
                continue;
            }
            if deposit.local_time > config.integration_time {
                log::debug!(
                    "Skipping charge carriers deposited beyond integration time: {} ns global / {} ns local",
                    deposit.global_time,
                    deposit.local_time
                );
                summary.skipped_deposits += 1;
                continue;
            }
            summary.deposits += 1;

            log::debug!(
                "Set of charge carriers ({}) on {}",
                deposit.carrier,
                deposit.local_position
            );

            let plan = GroupPlan::new(deposit.charge, config.charge_per_step, config.max_charge_groups);
            if plan.coarsened {
                summary.coarsened_deposits += 1;
                log::info!(
                    "Deposited charge: {}, which exceeds the maximum number of charge groups allowed. Increasing charge_per_step to {} for this deposit.",
                    deposit.charge,
                    plan.group_size
                );
            }

            for group in ChargeGroups::new(deposit.charge, plan) {
                let mut recorder = trajectories
                    .as_ref()
                    .map(|_| TrajectoryRecorder::new(config.resolved_trajectory_step()));
                let outcome = transport.propagate(
                    rng,
                    deposit.local_position,
                    deposit.carrier,
                    deposit.local_time,
                    recorder.as_mut(),
                );

                match outcome.state {
                    CarrierState::Recombined => {
                        log::debug!(
                            " Recombined {group} at {} in {:.4} ns time, removing",
                            outcome.position,
                            outcome.time
                        );
                        summary.recombined_charge += u64::from(group);
                    }
                    CarrierState::Trapped => {
                        log::debug!(
                            " Trapped {group} at {} in {:.4} ns time, removing",
                            outcome.position,
                            outcome.time
                        );
                        summary.trapped_charge += u64::from(group);
                    }
                    _ => {}
                }
                log::debug!(
                    " Propagated {group} to {} in {:.4} ns time, gain {}, final state: {}",
                    outcome.position,
                    outcome.time,
                    outcome.gain,
                    outcome.state
                );

                charges.push(PropagatedCharge {
                    local_position: outcome.position,
                    global_position: self.geometry.global_position(&outcome.position),
                    carrier: deposit.carrier,
                    charge: gained_charge(group, outcome.gain),
                    local_time: deposit.local_time + outcome.time,
                    global_time: deposit.global_time + outcome.time,
                    state: outcome.state,
                    deposit: DepositIndex(index),
                });

                if let (Some(list), Some(rec)) = (trajectories.as_mut(), recorder) {
                    list.push(rec.finish(
                        deposit.global_time,
                        group,
                        deposit.carrier,
                        outcome.diagnostic_state,
                    ));
                }

                summary.charge_groups += 1;
                summary.integration_steps += outcome.steps;
                summary.propagated_charge += u64::from(group);
                summary.weighted_time += f64::from(group) * outcome.time;
            }
        }

        summary.report();
        statistics.record(&summary);

        EventOutput {
            charges,
            trajectories,
            summary,
        }
    }
}

/// Group size scaled by gain, rounded half away from zero.
fn gained_charge(group: u32, gain: f64) -> u32 {
    let value = (f64::from(group) * gain).round();
    if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value.max(0.0) as u32
    }
}

/// Warn when the field near the implant side collects a carrier type that
/// is not propagated.
fn check_collected_carrier(
    config: &PropagationConfig,
    field: &dyn FieldProvider,
    geometry: &dyn SensorGeometry,
) {
    let center = geometry.sensor_center();
    let probe = Point3::new(
        center.x,
        center.y,
        center.z + geometry.sensor_size().z / 2.01,
    );
    let efield = field.electric_field(&probe);
    if efield.z.is_sign_negative() && !config.propagate_electrons {
        log::warn!(
            "Electric field indicates electron collection at implants, but electrons are not propagated!"
        );
    }
    if efield.z.is_sign_positive() && !config.propagate_holes {
        log::warn!(
            "Electric field indicates hole collection at implants, but holes are not propagated!"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gained_charge_rounds() {
        assert_eq!(gained_charge(10, 1.0), 10);
        assert_eq!(gained_charge(10, 1.25), 13);
        assert_eq!(gained_charge(10, 1.24), 12);
        assert_eq!(gained_charge(3, 0.0), 0);
        assert_eq!(gained_charge(u32::MAX, 2.0), u32::MAX);
    }
}

//! Transport of a single charge group through the sensor.
//!
//! [`Transport::propagate`] runs the per-step state machine: integrate,
//! diffuse, test containment, recombination and trapping, accumulate
//! multiplication gain, and adapt the timestep. The random draws of one
//! step are consumed in a fixed order (three diffusion samples, then
//! recombination, trapping, and detrapping if trapped) so a given
//! generator stream always yields the same trajectory.

use chargeprop_core::{
    CarrierState, CarrierType, FieldProvider, Point3, SensorGeometry, Vector3,
};
use chargeprop_physics::{
    drift_velocity, drift_velocity_in_magnetic_field, Detrapping, ImpactIonization, Mobility,
    Recombination, Trapping,
};
use rand::Rng;

use crate::config::{ConfigError, PropagationConfig};
use crate::diffusion::diffusion_step;
use crate::integrator::{IntegratorState, RungeKutta};
use crate::trajectory::{diagnostic_state, TrajectoryRecorder};

/// Gain above which the sensor is assumed to be in breakdown.
const BREAKDOWN_GAIN: f64 = 20.0;

/// Fraction of the thickness from the back face treated as backside
/// collection in recorded trajectories.
const BACKSIDE_FRACTION: f64 = 0.05;

/// The physical models used by one propagation module.
#[derive(Clone, Debug)]
pub struct PhysicsModels {
    /// Drift mobility.
    pub mobility: Mobility,
    /// Recombination.
    pub recombination: Recombination,
    /// Trapping.
    pub trapping: Trapping,
    /// Detrapping.
    pub detrapping: Detrapping,
    /// Impact ionization gain.
    pub multiplication: ImpactIonization,
}

impl PhysicsModels {
    /// Build every model named in `config`.
    ///
    /// `has_doping` reports whether the field provider carries a doping
    /// profile; doping-dependent models fail without one.
    pub fn from_config(config: &PropagationConfig, has_doping: bool) -> Result<Self, ConfigError> {
        let t = config.temperature;
        let params = &config.model_parameters;
        Ok(Self {
            mobility: Mobility::from_name(&config.mobility_model, t, params, has_doping)?,
            recombination: Recombination::from_name(
                &config.recombination_model,
                t,
                params,
                has_doping,
            )?,
            trapping: Trapping::from_name(&config.trapping_model, t, params)?,
            detrapping: Detrapping::from_name(&config.detrapping_model, params)?,
            multiplication: ImpactIonization::from_name(&config.multiplication_model, t, params)?,
        })
    }
}

/// Final result of transporting one group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome {
    /// Final local position; on the boundary for halted groups.
    pub position: Point3<f64>,
    /// Elapsed transport time, including detrapping delays.
    pub time: f64,
    /// Cumulative multiplication gain.
    pub gain: f64,
    /// Transport state at exit. Stays [`CarrierState::Motion`] when the
    /// integration window closed first.
    pub state: CarrierState,
    /// Integration steps taken.
    pub steps: u64,
    /// State assigned to a recorded trajectory.
    pub diagnostic_state: CarrierState,
}

/// Borrowed view of everything needed to transport groups.
pub struct Transport<'a> {
    config: &'a PropagationConfig,
    models: &'a PhysicsModels,
    field: &'a dyn FieldProvider,
    geometry: &'a dyn SensorGeometry,
    integrator: RungeKutta,
    use_magnetic_field: bool,
}

impl<'a> Transport<'a> {
    /// Bundle the collaborators of one propagation run.
    pub fn new(
        config: &'a PropagationConfig,
        models: &'a PhysicsModels,
        field: &'a dyn FieldProvider,
        geometry: &'a dyn SensorGeometry,
    ) -> Self {
        Self {
            config,
            models,
            field,
            geometry,
            integrator: RungeKutta::new(config.tableau),
            use_magnetic_field: field.has_magnetic_field() && !config.ignore_magnetic_field,
        }
    }

    /// Drift velocity of `carrier` at `position`.
    pub fn velocity(&self, carrier: CarrierType, position: &Point3<f64>) -> Vector3<f64> {
        let efield = self.field.electric_field(position);
        let doping = self.field.doping_concentration(position);
        let mobility = self.models.mobility.evaluate(carrier, efield.norm(), doping);
        if self.use_magnetic_field {
            let bfield = self.field.magnetic_field(position);
            drift_velocity_in_magnetic_field(carrier, mobility, &efield, &bfield)
        } else {
            drift_velocity(carrier, mobility, &efield)
        }
    }

    /// Transport one group of `carrier` from `start`, deposited at
    /// `initial_time` on the local clock.
    pub fn propagate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        start: Point3<f64>,
        carrier: CarrierType,
        initial_time: f64,
        mut recorder: Option<&mut TrajectoryRecorder>,
    ) -> Outcome {
        let config = self.config;
        let models = self.models;
        let top_face = self.geometry.sensor_center().z + self.geometry.sensor_size().z / 2.0;

        let mut integrator_state = IntegratorState::new(start, config.timestep_start);
        let mut last_position = start;
        // Seeded from the start position so the first gain average uses the real field.
        let mut efield = self.field.electric_field(&start).norm();
        let mut gain = 1.0;
        let mut steps = 0u64;
        let mut state = CarrierState::Motion;

        while !state.is_terminal()
            && initial_time + integrator_state.time < config.integration_time
        {
            if let Some(rec) = recorder.as_deref_mut() {
                rec.sample(integrator_state.time, &integrator_state.position);
            }

            last_position = integrator_state.position;
            let last_efield = efield;

            let result = self
                .integrator
                .step(|_, position| self.velocity(carrier, position), &integrator_state);
            let timestep = integrator_state.timestep;
            integrator_state = result.state;
            steps += 1;

            let position = integrator_state.position;
            efield = self.field.electric_field(&position).norm();
            let doping = self.field.doping_concentration(&position);
            let mobility = models.mobility.evaluate(carrier, efield, doping);
            integrator_state.position += diffusion_step(rng, mobility, config.temperature, timestep);
            let position = integrator_state.position;

            if !self.geometry.is_within_sensor(&position) {
                state = CarrierState::Halted;
            }

            let doping = self.field.doping_concentration(&position);
            if models
                .recombination
                .evaluate(carrier, doping, rng.random::<f64>(), timestep)
            {
                state = CarrierState::Recombined;
            }

            if models
                .trapping
                .evaluate(carrier, rng.random::<f64>(), timestep, efield)
            {
                let delay = models
                    .detrapping
                    .evaluate(carrier, rng.random::<f64>(), efield);
                if initial_time + integrator_state.time + delay < config.integration_time {
                    log::debug!("De-trapping charge carrier after {delay:.4} ns");
                    integrator_state.advance_time(delay);
                } else {
                    state = CarrierState::Trapped;
                }
            }

            log::trace!(
                "Step from {last_position} to {position} at {:.6} ns, state: {state}",
                initial_time + integrator_state.time
            );

            let step_length = result.step.norm();
            gain *= models
                .multiplication
                .evaluate(carrier, (efield + last_efield) / 2.0, step_length);
            if gain > BREAKDOWN_GAIN {
                log::warn!(
                    "Detected gain of {gain}, local electric field of {efield} MV/mm, diode seems to be in breakdown"
                );
            } else if gain > 1.0 {
                log::debug!(
                    "Calculated gain of {gain} for step of {step_length} mm from field of {last_efield} to {efield} MV/mm"
                );
            }

            integrator_state.timestep = self.adapt_timestep(
                timestep,
                top_face - position.z,
                result.step.z,
                result.error.norm(),
            );
        }

        let time = integrator_state.time;
        let mut position = integrator_state.position;
        if state == CarrierState::Halted {
            position = self.geometry.sensor_intercept(&last_position, &position);
        }

        match state {
            CarrierState::Recombined => log::debug!("Charge carrier recombined after {time:.4} ns"),
            CarrierState::Trapped => {
                log::debug!("Charge carrier trapped after {time:.4} ns at {position}")
            }
            _ => {}
        }

        let back_face = self.geometry.sensor_center().z - self.geometry.sensor_size().z / 2.0;
        let backside =
            last_position.z < back_face + BACKSIDE_FRACTION * self.geometry.sensor_size().z;
        let expired = initial_time + time >= config.integration_time;

        Outcome {
            position,
            time,
            gain,
            state,
            steps,
            diagnostic_state: diagnostic_state(state, expired, backside),
        }
    }

    /// Next timestep after a step of `timestep`.
    ///
    /// Shrinks near the top face, otherwise steers the local error
    /// estimate towards the configured spatial precision.
    fn adapt_timestep(
        &self,
        timestep: f64,
        distance_to_face: f64,
        step_z: f64,
        uncertainty: f64,
    ) -> f64 {
        let config = self.config;
        let mut next = timestep;
        if distance_to_face.abs() < 2.0 * step_z {
            next *= 0.75;
        } else if uncertainty > config.spatial_precision {
            next *= 0.75;
        } else if 2.0 * uncertainty < config.spatial_precision {
            next *= 1.5;
        }
        next.clamp(config.timestep_min, config.timestep_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chargeprop_test_utils::{BoxSensor, UniformField};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Box sensor that remembers the samples passed to `sensor_intercept`.
    struct RecordingSensor {
        inner: BoxSensor,
        intercepts: Mutex<Vec<(Point3<f64>, Point3<f64>)>>,
    }

    impl SensorGeometry for RecordingSensor {
        fn is_within_sensor(&self, position: &Point3<f64>) -> bool {
            self.inner.is_within_sensor(position)
        }

        fn sensor_intercept(&self, inside: &Point3<f64>, outside: &Point3<f64>) -> Point3<f64> {
            self.intercepts.lock().unwrap().push((*inside, *outside));
            self.inner.sensor_intercept(inside, outside)
        }

        fn sensor_center(&self) -> Point3<f64> {
            self.inner.sensor_center()
        }

        fn sensor_size(&self) -> Vector3<f64> {
            self.inner.sensor_size()
        }
    }

    fn config() -> PropagationConfig {
        PropagationConfig {
            mobility_model: "jacoboni".into(),
            ..Default::default()
        }
    }

    #[test]
    fn adapt_timestep_rules() {
        let cfg = config();
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let field = UniformField::new(Vector3::new(0.0, 0.0, 0.01));
        let sensor = BoxSensor::new(Vector3::new(1.0, 1.0, 0.3));
        let transport = Transport::new(&cfg, &models, &field, &sensor);

        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        // near the face
        assert!(close(transport.adapt_timestep(0.1, 0.001, 0.001, 0.0), 0.075));
        // imprecise
        assert!(close(transport.adapt_timestep(0.1, 1.0, 0.001, 1.0), 0.075));
        // very precise
        assert!(close(transport.adapt_timestep(0.1, 1.0, 0.001, 0.0), 0.15));
        // in between keeps the step
        let p = cfg.spatial_precision;
        assert_eq!(transport.adapt_timestep(0.1, 1.0, 0.001, 0.75 * p), 0.1);
        // clamped
        assert_eq!(transport.adapt_timestep(0.45, 1.0, 0.001, 0.0), cfg.timestep_max);
        assert_eq!(transport.adapt_timestep(0.001, 1.0, 0.001, 1.0), cfg.timestep_min);
    }

    #[test]
    fn velocity_ignores_magnetic_field_when_configured() {
        let mut cfg = config();
        cfg.ignore_magnetic_field = true;
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let field = UniformField::new(Vector3::new(0.0, 0.0, 0.01))
            .with_magnetic_field(Vector3::new(0.0, 0.004, 0.0));
        let sensor = BoxSensor::new(Vector3::new(1.0, 1.0, 0.3));
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let v = transport.velocity(CarrierType::Electron, &Point3::origin());
        assert_eq!(v.x, 0.0);
        assert!(v.z < 0.0);

        cfg.ignore_magnetic_field = false;
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let v = transport.velocity(CarrierType::Electron, &Point3::origin());
        assert!(v.x != 0.0);
    }

    #[test]
    fn halted_group_ends_on_boundary() {
        let cfg = config();
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        // Electrons drift against the field, towards +z.
        let field = UniformField::new(Vector3::new(0.0, 0.0, -0.01));
        let sensor = BoxSensor::new(Vector3::new(1.0, 1.0, 0.3));
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let out = transport.propagate(
            &mut rng,
            Point3::new(0.0, 0.0, 0.0),
            CarrierType::Electron,
            0.0,
            None,
        );
        assert_eq!(out.state, CarrierState::Halted);
        assert!((out.position.z - 0.15).abs() < 1e-9, "z = {}", out.position.z);
        assert_eq!(out.gain, 1.0);
        assert!(out.steps > 0);
        assert!(out.time > 0.0 && out.time < cfg.integration_time);
        assert_eq!(out.diagnostic_state, CarrierState::Halted);
    }

    #[test]
    fn window_already_closed_takes_no_step() {
        let cfg = config();
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let field = UniformField::new(Vector3::new(0.0, 0.0, -0.01));
        let sensor = BoxSensor::new(Vector3::new(1.0, 1.0, 0.3));
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let start = Point3::new(0.0, 0.0, 0.0);
        let out = transport.propagate(
            &mut rng,
            start,
            CarrierType::Electron,
            cfg.integration_time,
            None,
        );
        assert_eq!(out.steps, 0);
        assert_eq!(out.state, CarrierState::Motion);
        assert_eq!(out.position, start);
        assert_eq!(out.diagnostic_state, CarrierState::Unknown);
    }

    #[test]
    fn constant_recombination_and_trapping_terminate() {
        let mut cfg = config();
        cfg.recombination_model = "constant".into();
        cfg.model_parameters.lifetime_electron = Some(1e-6);
        cfg.model_parameters.lifetime_hole = Some(1e-6);
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let field = UniformField::new(Vector3::new(0.0, 0.0, -0.01));
        let sensor = BoxSensor::new(Vector3::new(1.0, 1.0, 0.3));
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let out = transport.propagate(&mut rng, Point3::origin(), CarrierType::Electron, 0.0, None);
        assert_eq!(out.state, CarrierState::Recombined);
        assert_eq!(out.steps, 1);

        let mut cfg = config();
        cfg.trapping_model = "constant".into();
        cfg.model_parameters.trapping_time_electron = Some(1e-6);
        cfg.model_parameters.trapping_time_hole = Some(1e-6);
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let out = transport.propagate(&mut rng, Point3::origin(), CarrierType::Electron, 0.0, None);
        assert_eq!(out.state, CarrierState::Trapped);
        assert_eq!(out.steps, 1);
    }

    #[test]
    fn detrapping_within_window_keeps_moving() {
        let mut cfg = config();
        cfg.trapping_model = "constant".into();
        cfg.model_parameters.trapping_time_electron = Some(1e-6);
        cfg.model_parameters.trapping_time_hole = Some(1e-6);
        cfg.detrapping_model = "constant".into();
        cfg.model_parameters.detrapping_time_electron = Some(1e-4);
        cfg.model_parameters.detrapping_time_hole = Some(1e-4);
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let field = UniformField::new(Vector3::new(0.0, 0.0, -0.01));
        let sensor = BoxSensor::new(Vector3::new(1.0, 1.0, 0.3));
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let out = transport.propagate(&mut rng, Point3::origin(), CarrierType::Electron, 0.0, None);
        // Trapped every step but always released quickly: reaches the face.
        assert_eq!(out.state, CarrierState::Halted);
        assert!(out.steps > 1);
    }

    #[test]
    fn recorder_collects_points() {
        let cfg = config();
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let field = UniformField::new(Vector3::new(0.0, 0.0, -0.01));
        let sensor = BoxSensor::new(Vector3::new(1.0, 1.0, 0.3));
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut recorder = TrajectoryRecorder::new(0.01);
        let out = transport.propagate(
            &mut rng,
            Point3::origin(),
            CarrierType::Electron,
            0.0,
            Some(&mut recorder),
        );
        assert!(!recorder.is_empty());
        assert!(recorder.len() as f64 <= out.time / 0.01 + 1.0);
    }

    #[test]
    fn exit_point_lies_between_last_samples() {
        let cfg = config();
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let field = UniformField::new(Vector3::new(0.004, -0.003, -0.01));
        let sensor = RecordingSensor {
            inner: BoxSensor::new(Vector3::new(1.0, 1.0, 0.3)),
            intercepts: Mutex::new(Vec::new()),
        };
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let out = transport.propagate(
            &mut rng,
            Point3::new(0.1, 0.1, -0.05),
            CarrierType::Electron,
            0.0,
            None,
        );
        assert_eq!(out.state, CarrierState::Halted);

        let intercepts = sensor.intercepts.lock().unwrap();
        assert_eq!(intercepts.len(), 1);
        let (inside, outside) = intercepts[0];
        assert!(sensor.is_within_sensor(&inside));
        assert!(!sensor.is_within_sensor(&outside));
        assert_eq!(out.position, sensor.inner.sensor_intercept(&inside, &outside));

        let legs = (out.position - inside).norm() + (outside - out.position).norm();
        assert!((legs - (outside - inside).norm()).abs() < 1e-12);
        let half = Vector3::new(0.5, 0.5, 0.15);
        assert!((0..3).all(|i| out.position[i].abs() <= half[i] + 1e-12));
        assert!((0..3).any(|i| (out.position[i].abs() - half[i]).abs() < 1e-12));
    }

    #[test]
    fn recombination_in_exit_step_wins_over_halt() {
        let field = UniformField::new(Vector3::new(0.0, 0.0, -0.01));
        let sensor = BoxSensor::new(Vector3::new(1.0, 1.0, 0.3));
        // Already beyond the top face: the first step always ends outside.
        let start = Point3::new(0.0, 0.0, 0.25);

        let cfg = config();
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let out = transport.propagate(
            &mut ChaCha8Rng::seed_from_u64(5),
            start,
            CarrierType::Electron,
            0.0,
            None,
        );
        assert_eq!(out.state, CarrierState::Halted);
        assert_eq!(out.steps, 1);

        let mut cfg = config();
        cfg.recombination_model = "constant".into();
        cfg.model_parameters.lifetime_electron = Some(1e-6);
        cfg.model_parameters.lifetime_hole = Some(1e-6);
        let models = PhysicsModels::from_config(&cfg, false).unwrap();
        let transport = Transport::new(&cfg, &models, &field, &sensor);
        let out = transport.propagate(
            &mut ChaCha8Rng::seed_from_u64(5),
            start,
            CarrierType::Electron,
            0.0,
            None,
        );
        assert_eq!(out.state, CarrierState::Recombined);
        assert_eq!(out.steps, 1);
        // No boundary intercept for a recombined group.
        assert!(!sensor.is_within_sensor(&out.position));
    }

    proptest! {
        #[test]
        fn every_timestep_stays_within_bounds(
            steps in proptest::collection::vec(
                (-1.0f64..1.0, -0.1f64..0.1, 0.0f64..1e-6),
                1..64,
            ),
        ) {
            let cfg = config();
            let models = PhysicsModels::from_config(&cfg, false).unwrap();
            let field = UniformField::new(Vector3::new(0.0, 0.0, -0.01));
            let sensor = BoxSensor::new(Vector3::new(1.0, 1.0, 0.3));
            let transport = Transport::new(&cfg, &models, &field, &sensor);

            let mut timestep = cfg.timestep_start;
            prop_assert!(timestep >= cfg.timestep_min && timestep <= cfg.timestep_max);
            for (distance, step_z, uncertainty) in steps {
                timestep = transport.adapt_timestep(timestep, distance, step_z, uncertainty);
                prop_assert!(timestep >= cfg.timestep_min && timestep <= cfg.timestep_max);
            }
        }
    }
}

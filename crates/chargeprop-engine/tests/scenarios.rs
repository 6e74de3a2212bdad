//! Integration test: end-to-end transport scenarios.
//!
//! Drives `ChargePropagation` with a box sensor in a uniform field and
//! checks group batching, boundary interception, skipping rules, gain and
//! reproducibility of the per-event random streams.

use std::sync::Arc;

use chargeprop_core::units::T;
use chargeprop_core::{CarrierState, CarrierType, DepositIndex, DepositedCharge, EventId, Point3, Vector3};
use chargeprop_engine::{
    event_rng, ChargePropagation, ConfigError, PropagationConfig, RunStatistics,
};
use chargeprop_test_utils::{electron_deposit, hole_deposit, BoxSensor, UniformField};

// ── Setup ────────────────────────────────────────────────────────────

const THICKNESS: f64 = 0.3;

/// 100 kV/cm pointing to -z: electrons drift to the top face at z = +0.15.
fn drift_field() -> UniformField {
    UniformField::new(Vector3::new(0.0, 0.0, -0.01))
}

fn sensor() -> Arc<BoxSensor> {
    Arc::new(BoxSensor::new(Vector3::new(2.0, 2.0, THICKNESS)))
}

fn module(config: PropagationConfig, field: UniformField) -> ChargePropagation {
    ChargePropagation::new(config, Arc::new(field), sensor()).unwrap()
}

fn run(module: &ChargePropagation, deposits: &[DepositedCharge], seed: u64) -> chargeprop_engine::EventOutput {
    let stats = RunStatistics::new();
    module.run_event(deposits, &mut event_rng(seed, EventId(0)), &stats)
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn hundred_electrons_collected_at_face() {
    let config = PropagationConfig {
        charge_per_step: 10,
        max_charge_groups: 1000,
        ..Default::default()
    };
    let m = module(config, drift_field());
    let out = run(&m, &[electron_deposit(Point3::origin(), 100)], 1);

    assert_eq!(out.charges.len(), 10);
    for charge in &out.charges {
        assert_eq!(charge.charge, 10);
        assert_eq!(charge.state, CarrierState::Halted);
        assert_eq!(charge.carrier, CarrierType::Electron);
        assert_eq!(charge.deposit, DepositIndex(0));
        assert!((charge.local_position.z - THICKNESS / 2.0).abs() < 1e-9);
        assert_eq!(charge.global_position, charge.local_position);
        assert!(charge.local_time > 0.0);
    }
    assert_eq!(out.charges.iter().map(|c| c.charge).sum::<u32>(), 100);
    assert_eq!(out.summary.propagated_charge, 100);
    assert_eq!(out.summary.charge_groups, 10);
    assert!(out.trajectories.is_none());
}

#[test]
fn large_deposit_is_coarsened() {
    let config = PropagationConfig {
        charge_per_step: 10,
        max_charge_groups: 100,
        ..Default::default()
    };
    let m = module(config, drift_field());
    let out = run(&m, &[electron_deposit(Point3::new(0.0, 0.0, 0.1), 5000)], 2);

    assert_eq!(out.charges.len(), 100);
    assert!(out.charges.iter().all(|c| c.charge == 50));
    assert_eq!(out.summary.coarsened_deposits, 1);
    assert_eq!(out.summary.propagated_charge, 5000);
}

#[test]
fn late_and_unselected_deposits_are_skipped() {
    let m = module(PropagationConfig::default(), drift_field());
    let late = DepositedCharge::new(Point3::origin(), CarrierType::Electron, 10, 30.0);
    let holes = hole_deposit(Point3::origin(), 10);
    let stats = RunStatistics::new();
    let out = m.run_event(&[late, holes], &mut event_rng(0, EventId(0)), &stats);

    assert!(out.charges.is_empty());
    assert_eq!(out.summary.skipped_deposits, 2);
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.events, 1);
    assert_eq!(snapshot.skipped_deposits, 2);
    assert_eq!(snapshot.deposits, 0);
}

#[test]
fn deposit_index_refers_to_input_position() {
    let m = module(PropagationConfig::default(), drift_field());
    let deposits = [
        hole_deposit(Point3::origin(), 10),
        electron_deposit(Point3::origin(), 20),
    ];
    let out = run(&m, &deposits, 3);
    assert_eq!(out.charges.len(), 2);
    assert!(out.charges.iter().all(|c| c.deposit == DepositIndex(1)));
}

#[test]
fn same_stream_is_bit_identical() {
    let m = module(PropagationConfig::default(), drift_field());
    let deposits = [electron_deposit(Point3::new(0.1, -0.2, -0.1), 50)];
    let a = run(&m, &deposits, 99);
    let b = run(&m, &deposits, 99);
    assert_eq!(a.charges, b.charges);
    let c = run(&m, &deposits, 100);
    assert_ne!(a.charges, c.charges);
}

#[test]
fn gain_above_threshold() {
    // 110 kV/cm, just above the default multiplication threshold.
    let field = UniformField::new(Vector3::new(0.0, 0.0, -0.011));
    let config = PropagationConfig {
        multiplication_model: "massey".into(),
        ..Default::default()
    };
    let m = module(config, field);
    let out = run(&m, &[electron_deposit(Point3::origin(), 10)], 4);
    assert_eq!(out.charges.len(), 1);
    let charge = &out.charges[0];
    assert_eq!(charge.state, CarrierState::Halted);
    assert!(charge.charge > 10 && charge.charge < 20, "got {}", charge.charge);
    // Statistics count carriers before gain.
    assert_eq!(out.summary.propagated_charge, 10);
}

#[test]
fn magnetic_field_deflects_electrons() {
    let deposits = [electron_deposit(Point3::origin(), 100)];
    let mean_x = |field: UniformField, ignore: bool| {
        let config = PropagationConfig {
            ignore_magnetic_field: ignore,
            ..Default::default()
        };
        let out = run(&module(config, field), &deposits, 5);
        out.charges.iter().map(|c| c.local_position.x).sum::<f64>() / out.charges.len() as f64
    };
    let with_b = || drift_field().with_magnetic_field(Vector3::new(0.0, 4.0 * T, 0.0));

    assert!(mean_x(with_b(), false).abs() > 4e-3);
    assert!(mean_x(with_b(), true).abs() < 4e-3);
    assert!(mean_x(drift_field(), false).abs() < 4e-3);
}

#[test]
fn trajectories_recorded_when_enabled() {
    let config = PropagationConfig {
        output_trajectories: true,
        trajectory_step: Some(0.05),
        ..Default::default()
    };
    let m = module(config, drift_field());
    let out = run(&m, &[electron_deposit(Point3::origin(), 30)], 6);
    let trajectories = out.trajectories.expect("trajectories enabled");
    assert_eq!(trajectories.len(), out.charges.len());
    for t in &trajectories {
        assert_eq!(t.charge, 10);
        assert_eq!(t.state, CarrierState::Halted);
        assert!(!t.points.is_empty());
        assert_eq!(t.points[0], Point3::origin());
    }
}

// ── Construction errors ──────────────────────────────────────────────

#[test]
fn doping_models_need_a_profile() {
    let config = PropagationConfig {
        mobility_model: "masetti".into(),
        ..Default::default()
    };
    let err = ChargePropagation::new(config.clone(), Arc::new(drift_field()), sensor())
        .err()
        .expect("no doping profile");
    assert!(matches!(err, ConfigError::Model(_)));

    let field = drift_field().with_doping(1e12 * chargeprop_core::units::PER_CM3);
    assert!(ChargePropagation::new(config, Arc::new(field), sensor()).is_ok());
}

#[test]
fn unknown_selector_fails_fast() {
    let config = PropagationConfig {
        detrapping_model: "thermal".into(),
        ..Default::default()
    };
    let result = ChargePropagation::new(config, Arc::new(drift_field()), sensor());
    assert!(matches!(result, Err(ConfigError::Model(_))));
}

#[test]
fn no_carrier_type_selected() {
    let config = PropagationConfig {
        propagate_electrons: false,
        propagate_holes: false,
        ..Default::default()
    };
    let result = ChargePropagation::new(config, Arc::new(drift_field()), sensor());
    assert!(matches!(result, Err(ConfigError::NoCarrierSelected)));
}

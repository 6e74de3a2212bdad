//! Carrier transport engine.
//!
//! Turns the deposits of one event into propagated charges. Each deposit
//! is split into charge groups by the [`batcher`]; every group is driven
//! through the sensor by the [`driver`], which advances an adaptive
//! Runge-Kutta [`integrator`], adds [`diffusion`] and consults the
//! physical models after every step. [`ChargePropagation`] ties these
//! together for one event and [`EventPool`] runs many events in parallel
//! with reproducible per-event random streams.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batcher;
pub mod config;
pub mod diffusion;
pub mod driver;
pub mod integrator;
pub mod pool;
pub mod propagation;
pub mod statistics;
pub mod trajectory;

pub use batcher::{ChargeGroups, GroupPlan};
pub use config::{ConfigError, PoolConfig, PropagationConfig};
pub use driver::{Outcome, PhysicsModels, Transport};
pub use integrator::{IntegratorState, RungeKutta, StepResult, Tableau};
pub use pool::{event_rng, EventPool, EventResult};
pub use propagation::{ChargePropagation, EventOutput};
pub use statistics::{EventSummary, RunStatistics, StatisticsSnapshot};
pub use trajectory::{Trajectory, TrajectoryRecorder};

//! Test utilities and mock collaborators for chargeprop development.
//!
//! Provides simple implementations of the collaborator traits
//! ([`FieldProvider`], [`SensorGeometry`]) and deposit fixtures for
//! building transport scenarios without a detector description.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use chargeprop_core::{FieldProvider, Point3, SensorGeometry, Vector3};

pub use fixtures::{deposit_at, deposits_along_z, electron_deposit, hole_deposit};

/// Axis-aligned box sensor.
///
/// The intercept is exact: it solves for the first face the segment
/// crosses.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSensor {
    center: Point3<f64>,
    size: Vector3<f64>,
}

impl BoxSensor {
    /// Box of extent `size` centered on the origin.
    pub fn new(size: Vector3<f64>) -> Self {
        Self {
            center: Point3::origin(),
            size,
        }
    }

    /// Move the box center.
    pub fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    fn min(&self) -> Point3<f64> {
        self.center - self.size / 2.0
    }

    fn max(&self) -> Point3<f64> {
        self.center + self.size / 2.0
    }
}

impl SensorGeometry for BoxSensor {
    fn is_within_sensor(&self, position: &Point3<f64>) -> bool {
        let (lo, hi) = (self.min(), self.max());
        (0..3).all(|i| position[i] >= lo[i] && position[i] <= hi[i])
    }

    fn sensor_intercept(&self, inside: &Point3<f64>, outside: &Point3<f64>) -> Point3<f64> {
        let (lo, hi) = (self.min(), self.max());
        let direction = outside - inside;
        let mut t_exit: f64 = 1.0;
        for i in 0..3 {
            let bound = if outside[i] > hi[i] {
                hi[i]
            } else if outside[i] < lo[i] {
                lo[i]
            } else {
                continue;
            };
            if direction[i] != 0.0 {
                t_exit = t_exit.min((bound - inside[i]) / direction[i]);
            }
        }
        inside + direction * t_exit.max(0.0)
    }

    fn sensor_center(&self) -> Point3<f64> {
        self.center
    }

    fn sensor_size(&self) -> Vector3<f64> {
        self.size
    }
}

/// Spatially constant fields.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformField {
    electric: Vector3<f64>,
    magnetic: Option<Vector3<f64>>,
    doping: Option<f64>,
}

impl UniformField {
    /// Constant electric field, no magnetic field, no doping profile.
    pub fn new(electric: Vector3<f64>) -> Self {
        Self {
            electric,
            magnetic: None,
            doping: None,
        }
    }

    /// No fields at all.
    pub fn empty() -> Self {
        Self::new(Vector3::zeros())
    }

    /// Add a constant magnetic field.
    pub fn with_magnetic_field(mut self, magnetic: Vector3<f64>) -> Self {
        self.magnetic = Some(magnetic);
        self
    }

    /// Add a constant doping concentration.
    pub fn with_doping(mut self, concentration: f64) -> Self {
        self.doping = Some(concentration);
        self
    }
}

impl FieldProvider for UniformField {
    fn electric_field(&self, _position: &Point3<f64>) -> Vector3<f64> {
        self.electric
    }

    fn magnetic_field(&self, _position: &Point3<f64>) -> Vector3<f64> {
        self.magnetic.unwrap_or_else(Vector3::zeros)
    }

    fn doping_concentration(&self, _position: &Point3<f64>) -> f64 {
        self.doping.unwrap_or(0.0)
    }

    fn has_electric_field(&self) -> bool {
        self.electric != Vector3::zeros()
    }

    fn has_magnetic_field(&self) -> bool {
        self.magnetic.is_some()
    }

    fn has_doping_profile(&self) -> bool {
        self.doping.is_some()
    }
}

//! Collaborator traits for field, doping, and sensor geometry queries.
//!
//! Both traits are read-only and `Send + Sync`: worker threads share one
//! instance behind an `Arc` and query it concurrently. Implementations must
//! not cache anything across calls that could make results depend on
//! query order.

use nalgebra::{Point3, Vector3};

/// Electric field, magnetic field and doping concentration of a sensor.
///
/// Positions are in local sensor coordinates.
pub trait FieldProvider: Send + Sync {
    /// Electric field at `position`, zero where the field is undefined.
    fn electric_field(&self, position: &Point3<f64>) -> Vector3<f64>;

    /// Magnetic field at `position`, zero where undefined.
    fn magnetic_field(&self, position: &Point3<f64>) -> Vector3<f64>;

    /// Effective doping concentration at `position`.
    ///
    /// Positive values denote n-type, negative values p-type doping.
    /// Only meaningful when [`has_doping_profile`](Self::has_doping_profile)
    /// returns `true`; otherwise implementations return zero.
    fn doping_concentration(&self, position: &Point3<f64>) -> f64;

    /// Whether an electric field is loaded.
    fn has_electric_field(&self) -> bool;

    /// Whether a magnetic field is loaded.
    fn has_magnetic_field(&self) -> bool;

    /// Whether a doping profile is loaded.
    fn has_doping_profile(&self) -> bool;
}

/// Geometry of the sensitive volume.
pub trait SensorGeometry: Send + Sync {
    /// Whether `position` lies inside the sensor volume.
    fn is_within_sensor(&self, position: &Point3<f64>) -> bool;

    /// Point where the segment from `inside` to `outside` crosses the
    /// sensor boundary.
    fn sensor_intercept(&self, inside: &Point3<f64>, outside: &Point3<f64>) -> Point3<f64>;

    /// Center of the sensor volume in local coordinates.
    fn sensor_center(&self) -> Point3<f64>;

    /// Full extent of the sensor along each axis; `z` is the thickness.
    fn sensor_size(&self) -> Vector3<f64>;

    /// Transform a local position into the global frame.
    ///
    /// Default: the frames coincide.
    fn global_position(&self, local: &Point3<f64>) -> Point3<f64> {
        *local
    }
}

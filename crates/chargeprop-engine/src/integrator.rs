//! Embedded Runge-Kutta integration of carrier position over time.
//!
//! The integrator owns no trajectory state. Callers thread an explicit
//! [`IntegratorState`] through [`RungeKutta::step`], which evaluates the
//! velocity field at the stage points and returns the advanced state
//! together with the step taken and its local error estimate.

use chargeprop_core::{Point3, Vector3};

/// Butcher tableau of an embedded 4(5) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tableau {
    /// Runge-Kutta-Fehlberg 4(5).
    #[default]
    Fehlberg,
    /// Cash-Karp 4(5).
    CashKarp,
}

struct Coefficients {
    /// Stage time fractions.
    c: [f64; 6],
    /// Lower-triangular stage weights; row `i` uses the first `i` entries.
    a: [[f64; 5]; 6],
    /// Fifth-order solution weights.
    high: [f64; 6],
    /// Fourth-order solution weights.
    low: [f64; 6],
}

const FEHLBERG: Coefficients = Coefficients {
    c: [0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0],
    a: [
        [0.0, 0.0, 0.0, 0.0, 0.0],
        [1.0 / 4.0, 0.0, 0.0, 0.0, 0.0],
        [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0],
        [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0],
        [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0],
        [-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
    ],
    high: [
        16.0 / 135.0,
        0.0,
        6656.0 / 12825.0,
        28561.0 / 56430.0,
        -9.0 / 50.0,
        2.0 / 55.0,
    ],
    low: [
        25.0 / 216.0,
        0.0,
        1408.0 / 2565.0,
        2197.0 / 4104.0,
        -1.0 / 5.0,
        0.0,
    ],
};

const CASH_KARP: Coefficients = Coefficients {
    c: [0.0, 1.0 / 5.0, 3.0 / 10.0, 3.0 / 5.0, 1.0, 7.0 / 8.0],
    a: [
        [0.0, 0.0, 0.0, 0.0, 0.0],
        [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
        [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
        [3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0, 0.0, 0.0],
        [-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0, 0.0],
        [
            1631.0 / 55296.0,
            175.0 / 512.0,
            575.0 / 13824.0,
            44275.0 / 110592.0,
            253.0 / 4096.0,
        ],
    ],
    high: [
        37.0 / 378.0,
        0.0,
        250.0 / 621.0,
        125.0 / 594.0,
        0.0,
        512.0 / 1771.0,
    ],
    low: [
        2825.0 / 27648.0,
        0.0,
        18575.0 / 48384.0,
        13525.0 / 55296.0,
        277.0 / 14336.0,
        1.0 / 4.0,
    ],
};

/// Position, elapsed time and current timestep of one trajectory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegratorState {
    /// Current position.
    pub position: Point3<f64>,
    /// Elapsed time since the start of the trajectory.
    pub time: f64,
    /// Timestep used by the next call to [`RungeKutta::step`].
    pub timestep: f64,
}

impl IntegratorState {
    /// State at `position` with zero elapsed time.
    pub fn new(position: Point3<f64>, timestep: f64) -> Self {
        Self {
            position,
            time: 0.0,
            timestep,
        }
    }

    /// Advance the elapsed time by `dt` without moving.
    pub fn advance_time(&mut self, dt: f64) {
        self.time += dt;
    }
}

/// Outcome of one integration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepResult {
    /// Advanced state; the timestep is carried over unchanged.
    pub state: IntegratorState,
    /// Displacement taken (fifth-order increment).
    pub step: Vector3<f64>,
    /// Difference between the fifth- and fourth-order increments.
    pub error: Vector3<f64>,
}

/// Explicit embedded Runge-Kutta stepper.
#[derive(Clone, Copy)]
pub struct RungeKutta {
    tableau: Tableau,
    coefficients: &'static Coefficients,
}

impl RungeKutta {
    /// Stepper using `tableau`.
    pub fn new(tableau: Tableau) -> Self {
        let coefficients = match tableau {
            Tableau::Fehlberg => &FEHLBERG,
            Tableau::CashKarp => &CASH_KARP,
        };
        Self {
            tableau,
            coefficients,
        }
    }

    /// Take one step of `state.timestep` through the velocity field `f(t, x)`.
    pub fn step<F>(&self, mut f: F, state: &IntegratorState) -> StepResult
    where
        F: FnMut(f64, &Point3<f64>) -> Vector3<f64>,
    {
        let k = self.coefficients;
        let h = state.timestep;
        let mut stages = [Vector3::<f64>::zeros(); 6];

        for i in 0..6 {
            let mut offset = Vector3::<f64>::zeros();
            for (j, stage) in stages.iter().enumerate().take(i) {
                offset += k.a[i][j] * stage;
            }
            stages[i] = h * f(state.time + k.c[i] * h, &(state.position + offset));
        }

        let mut high = Vector3::<f64>::zeros();
        let mut low = Vector3::<f64>::zeros();
        for (i, stage) in stages.iter().enumerate() {
            high += k.high[i] * stage;
            low += k.low[i] * stage;
        }

        StepResult {
            state: IntegratorState {
                position: state.position + high,
                time: state.time + h,
                timestep: h,
            },
            step: high,
            error: high - low,
        }
    }
}

impl std::fmt::Debug for RungeKutta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RungeKutta")
            .field("tableau", &self.tableau)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights_sum(w: &[f64; 6]) -> f64 {
        w.iter().sum()
    }

    #[test]
    fn weights_are_consistent() {
        for coefficients in [&FEHLBERG, &CASH_KARP] {
            assert!((weights_sum(&coefficients.high) - 1.0).abs() < 1e-14);
            assert!((weights_sum(&coefficients.low) - 1.0).abs() < 1e-14);
            // Row sums of a equal c.
            for i in 0..6 {
                let row: f64 = coefficients.a[i].iter().sum();
                assert!((row - coefficients.c[i]).abs() < 1e-14, "row {i}");
            }
        }
    }

    #[test]
    fn constant_velocity_is_exact() {
        for tableau in [Tableau::Fehlberg, Tableau::CashKarp] {
            let rk = RungeKutta::new(tableau);
            let v = Vector3::new(1.0, -2.0, 0.5);
            let start = IntegratorState::new(Point3::new(0.0, 0.0, 0.0), 0.1);
            let result = rk.step(|_, _| v, &start);
            assert!((result.step - v * 0.1).norm() < 1e-14);
            assert!(result.error.norm() < 1e-14);
            assert_eq!(result.state.time, 0.1);
            assert_eq!(result.state.timestep, 0.1);
        }
    }

    #[test]
    fn exponential_decay_matches_analytic() {
        for tableau in [Tableau::Fehlberg, Tableau::CashKarp] {
            let rk = RungeKutta::new(tableau);
            let mut state = IntegratorState::new(Point3::new(0.0, 0.0, 1.0), 0.05);
            let mut max_error: f64 = 0.0;
            for _ in 0..20 {
                let result = rk.step(|_, x| -x.coords, &state);
                max_error = max_error.max(result.error.norm());
                state = result.state;
            }
            let expected = (-1.0f64).exp();
            assert!((state.position.z - expected).abs() < 1e-9, "{tableau:?}");
            assert!(max_error < 1e-7);
            assert!(max_error > 0.0);
        }
    }

    #[test]
    fn stage_times_follow_tableau() {
        let rk = RungeKutta::new(Tableau::Fehlberg);
        let mut times = Vec::new();
        let state = IntegratorState {
            position: Point3::origin(),
            time: 2.0,
            timestep: 0.4,
        };
        rk.step(
            |t, _| {
                times.push(t);
                Vector3::zeros()
            },
            &state,
        );
        let expected: Vec<f64> = FEHLBERG.c.iter().map(|c| 2.0 + c * 0.4).collect();
        assert_eq!(times, expected);
    }

    #[test]
    fn advance_time_keeps_position() {
        let mut state = IntegratorState::new(Point3::new(1.0, 2.0, 3.0), 0.1);
        state.advance_time(5.0);
        assert_eq!(state.time, 5.0);
        assert_eq!(state.position, Point3::new(1.0, 2.0, 3.0));
    }
}

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for planar unicycle-model kinematics."]
#![doc = ""]
#![doc = "This crate provides the robot pose and control types, three single-step"]
#![doc = "integrators (RK4, closed-form chord, forward Euler) and a trajectory driver"]
#![doc = "that feeds a stepper's output back into itself for a fixed number of steps."]

extern crate alloc;

use core::f64::consts::PI;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub mod integrator;
pub mod trajectory;

pub use error::KinematicsError;
pub use integrator::{
    Chord, Euler, Integrator, IntegratorKind, Rk4, STRAIGHT_LINE_THRESHOLD, chord_step,
    chord_step_with_radius, euler_step, rk4_step,
};
pub use trajectory::{Rollout, SimulationParams, Trajectory, rollout, simulate, simulate_with};

/// A 2‑D pose `(x, y, θ)` in meters and radians (θ measured counter‑clockwise
/// from the x‑axis in the world frame).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World‑frame x position (m).
    pub x: f64,
    /// World‑frame y position (m).
    pub y: f64,
    /// Heading (rad). Accumulates without wrapping; see [`Pose::normalized`].
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: World-frame x position in meters.
    /// * `y`: World-frame y position in meters.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// The `(x, y)` position of this pose.
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Returns `true` if every component is neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.theta.is_finite()
    }

    /// Returns a copy of this pose with its heading wrapped into `[-PI, PI)`.
    pub fn normalized(&self) -> Self {
        Pose {
            theta: Pose::normalize_angle(self.theta),
            ..*self
        }
    }

    /// Normalize an angle to be within `[-PI, PI)`.
    ///
    /// Angles at `PI` will be normalized to `-PI`.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle in radians to normalize.
    ///
    /// # Returns
    ///
    /// The normalized angle in radians.
    pub fn normalize_angle(angle: f64) -> f64 {
        let a = angle % (2.0 * PI);
        if a >= PI {
            a - 2.0 * PI
        } else if a < -PI {
            a + 2.0 * PI
        } else {
            a
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.3}, y: {:.3}, θ: {:.3} rad)", self.x, self.y, self.theta)
    }
}

/// Linear and angular velocity commanded to the unicycle.
///
/// Both values are held constant across a single step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Control {
    /// Linear velocity along the current heading (m/s).
    pub v: f64,
    /// Angular velocity, counter-clockwise positive (rad/s).
    pub omega: f64,
}

impl Control {
    /// Construct a control from linear and angular velocity.
    ///
    /// # Arguments
    ///
    /// * `v`: Linear velocity (m/s).
    /// * `omega`: Angular velocity (rad/s).
    pub const fn new(v: f64, omega: f64) -> Self {
        Control { v, omega }
    }

    /// Construct a control that drives an arc of the given turning radius at speed `v`.
    ///
    /// The angular velocity is derived as `omega = v / radius`. An infinite
    /// radius yields straight-line motion. A negative radius turns clockwise
    /// for positive `v`.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTurningRadius)` if `radius` is zero or NaN.
    pub fn from_turning_radius(v: f64, radius: f64) -> Result<Self, KinematicsError> {
        if radius.is_nan() {
            return Err(KinematicsError::InvalidTurningRadius("must not be NaN"));
        }
        if radius == 0.0 {
            return Err(KinematicsError::InvalidTurningRadius("must be non-zero"));
        }
        Ok(Control { v, omega: v / radius })
    }

    /// The signed radius of the arc traced under this control, or `None`
    /// when the robot is not turning.
    pub fn turning_radius(&self) -> Option<f64> {
        if self.omega == 0.0 {
            None
        } else {
            Some(self.v / self.omega)
        }
    }

    /// Returns `true` if both velocities are neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        self.v.is_finite() && self.omega.is_finite()
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} m/s, ω: {:.2} rad/s)", self.v, self.omega)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_pose_normalization() {
        assert!((Pose::normalize_angle(0.0) - 0.0).abs() < EPSILON);
        assert!((Pose::normalize_angle(PI) - (-PI)).abs() < EPSILON); // PI maps to -PI for [-PI, PI)
        assert!((Pose::normalize_angle(-PI) - -PI).abs() < EPSILON);
        assert!((Pose::normalize_angle(2.5 * PI) - 0.5 * PI).abs() < EPSILON);
        assert!((Pose::normalize_angle(-2.5 * PI) - -0.5 * PI).abs() < EPSILON);
    }

    #[test]
    fn test_normalized_keeps_position() {
        let pose = Pose::new(1.0, -2.0, 5.0 * PI / 2.0);
        let wrapped = pose.normalized();
        assert_eq!(wrapped.x, 1.0);
        assert_eq!(wrapped.y, -2.0);
        assert!((wrapped.theta - PI / 2.0).abs() < EPSILON);
        // The original is untouched.
        assert_eq!(pose.theta, 5.0 * PI / 2.0);
    }

    #[test]
    fn test_control_from_turning_radius() {
        let control = Control::from_turning_radius(1.0, 2.0).unwrap();
        assert_eq!(control.v, 1.0);
        assert!((control.omega - 0.5).abs() < EPSILON);

        let faster = Control::from_turning_radius(3.0, 2.0).unwrap();
        assert!((faster.omega - 1.5).abs() < EPSILON);

        let clockwise = Control::from_turning_radius(1.0, -4.0).unwrap();
        assert!((clockwise.omega - (-0.25)).abs() < EPSILON);
    }

    #[test]
    fn test_control_infinite_radius_is_straight() {
        let control = Control::from_turning_radius(1.0, f64::INFINITY).unwrap();
        assert_eq!(control.omega, 0.0);
        assert_eq!(control.turning_radius(), None);
    }

    #[test]
    fn test_control_invalid_turning_radius() {
        let result = Control::from_turning_radius(1.0, 0.0);
        assert!(matches!(result, Err(KinematicsError::InvalidTurningRadius("must be non-zero"))));
        let result_nan = Control::from_turning_radius(1.0, f64::NAN);
        assert!(matches!(result_nan, Err(KinematicsError::InvalidTurningRadius("must not be NaN"))));
    }

    #[test]
    fn test_turning_radius_round_trip() {
        let control = Control::new(1.0, 0.5);
        assert!((control.turning_radius().unwrap() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_is_finite() {
        assert!(Pose::new(0.0, 0.0, 0.0).is_finite());
        assert!(!Pose::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Pose::new(0.0, 0.0, f64::INFINITY).is_finite());
        assert!(Control::new(1.0, -1.0).is_finite());
        assert!(!Control::new(f64::NEG_INFINITY, 0.0).is_finite());
    }
}

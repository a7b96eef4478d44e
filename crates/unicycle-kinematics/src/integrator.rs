//! Single-step integrators for the unicycle model.
//!
//! The continuous-time model is
//!
//! ```text
//! ẋ = v cos θ
//! ẏ = v sin θ
//! θ̇ = ω
//! ```
//!
//! with `v` and `ω` held constant across a step. Every stepper here is a pure
//! function: it receives a pose by value and returns the next one. Headings
//! accumulate without wrapping.

use core::fmt;
use core::str::FromStr;

use libm::{cos, fabs, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Control, KinematicsError, Pose};

/// Heading change per step at or below which the chord stepper falls back to
/// straight-line motion.
///
/// The comparison is strict: the arc formula is used only when
/// `|ω·dt| > STRAIGHT_LINE_THRESHOLD`.
pub const STRAIGHT_LINE_THRESHOLD: f64 = 1e-6;

/// A method of advancing a pose by one time step under a constant control.
pub trait Integrator {
    /// Advance `pose` by `dt` seconds under `control`.
    fn step(&self, pose: Pose, control: Control, dt: f64) -> Pose;

    /// Short lowercase identifier, used in logs and configuration.
    fn name(&self) -> &'static str;
}

/// Classical fourth-order Runge-Kutta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rk4;

/// Exact closed-form arc update via the chord between arc endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Chord;

/// First-order forward Euler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Euler;

impl Integrator for Rk4 {
    fn step(&self, pose: Pose, control: Control, dt: f64) -> Pose {
        rk4_step(pose, control, dt)
    }

    fn name(&self) -> &'static str {
        "rk4"
    }
}

impl Integrator for Chord {
    fn step(&self, pose: Pose, control: Control, dt: f64) -> Pose {
        chord_step(pose, control, dt)
    }

    fn name(&self) -> &'static str {
        "chord"
    }
}

impl Integrator for Euler {
    fn step(&self, pose: Pose, control: Control, dt: f64) -> Pose {
        euler_step(pose, control, dt)
    }

    fn name(&self) -> &'static str {
        "euler"
    }
}

/// Runtime selection of an integrator, e.g. from configuration.
///
/// Deserializes from the same lowercase names accepted by [`FromStr`].
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegratorKind {
    /// See [`Rk4`].
    Rk4,
    /// See [`Chord`].
    Chord,
    /// See [`Euler`].
    Euler,
}

impl Integrator for IntegratorKind {
    fn step(&self, pose: Pose, control: Control, dt: f64) -> Pose {
        match self {
            IntegratorKind::Rk4 => rk4_step(pose, control, dt),
            IntegratorKind::Chord => chord_step(pose, control, dt),
            IntegratorKind::Euler => euler_step(pose, control, dt),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            IntegratorKind::Rk4 => Rk4.name(),
            IntegratorKind::Chord => Chord.name(),
            IntegratorKind::Euler => Euler.name(),
        }
    }
}

impl FromStr for IntegratorKind {
    type Err = KinematicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rk4" => Ok(IntegratorKind::Rk4),
            "chord" => Ok(IntegratorKind::Chord),
            "euler" => Ok(IntegratorKind::Euler),
            _ => Err(KinematicsError::UnknownIntegrator(
                "expected one of `rk4`, `chord`, `euler`",
            )),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for IntegratorKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = alloc::string::String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Time derivative of `(x, y, θ)`. Only the heading enters the model, so the
/// derivative is a function of θ alone.
#[inline]
fn derivative(theta: f64, control: Control) -> (f64, f64, f64) {
    (control.v * cos(theta), control.v * sin(theta), control.omega)
}

/// Advance a pose by one step of classical fourth-order Runge-Kutta.
///
/// Local truncation error is `O(dt^5)`. No input validation is performed.
///
/// # Arguments
///
/// * `pose`: The pose at the start of the step.
/// * `control`: Linear and angular velocity, held constant over the step.
/// * `dt`: Step length in seconds.
pub fn rk4_step(pose: Pose, control: Control, dt: f64) -> Pose {
    let half = dt / 2.0;

    let k1 = derivative(pose.theta, control);
    let k2 = derivative(pose.theta + half * k1.2, control);
    let k3 = derivative(pose.theta + half * k2.2, control);
    let k4 = derivative(pose.theta + dt * k3.2, control);

    let sixth = dt / 6.0;
    Pose {
        x: pose.x + sixth * (k1.0 + 2.0 * k2.0 + 2.0 * k3.0 + k4.0),
        y: pose.y + sixth * (k1.1 + 2.0 * k2.1 + 2.0 * k3.1 + k4.1),
        theta: pose.theta + sixth * (k1.2 + 2.0 * k2.2 + 2.0 * k3.2 + k4.2),
    }
}

/// Advance a pose by one step using the exact arc solution.
///
/// For constant `(v, ω)` the robot traces a circular arc of radius `v / ω`
/// subtending `Δθ = ω·dt`. The displacement is the chord of that arc,
/// `2 (v/ω) sin(Δθ/2)`, taken along the midpoint heading `θ + Δθ/2`. When
/// `|Δθ|` is at or below [`STRAIGHT_LINE_THRESHOLD`] the chord length is
/// replaced by its limit `v·dt`.
///
/// # Arguments
///
/// * `pose`: The pose at the start of the step.
/// * `control`: Linear and angular velocity, held constant over the step.
/// * `dt`: Step length in seconds.
pub fn chord_step(pose: Pose, control: Control, dt: f64) -> Pose {
    let delta_theta = control.omega * dt;

    let delta_s = if fabs(delta_theta) > STRAIGHT_LINE_THRESHOLD {
        2.0 * (control.v / control.omega) * sin(delta_theta / 2.0)
    } else {
        control.v * dt
    };

    let theta_mid = pose.theta + delta_theta / 2.0;

    Pose {
        x: pose.x + delta_s * cos(theta_mid),
        y: pose.y + delta_s * sin(theta_mid),
        theta: pose.theta + delta_theta,
    }
}

/// Chord step parameterized by turning radius instead of angular velocity.
///
/// # Errors
///
/// Returns `Err(KinematicsError::InvalidTurningRadius)` if `radius` is zero or NaN.
pub fn chord_step_with_radius(
    pose: Pose,
    v: f64,
    radius: f64,
    dt: f64,
) -> Result<Pose, KinematicsError> {
    let control = Control::from_turning_radius(v, radius)?;
    Ok(chord_step(pose, control, dt))
}

/// Advance a pose by one forward-Euler step.
///
/// Uses the heading at the start of the step for the whole displacement.
pub fn euler_step(pose: Pose, control: Control, dt: f64) -> Pose {
    let (dx, dy, dtheta) = derivative(pose.theta, control);
    Pose {
        x: pose.x + dx * dt,
        y: pose.y + dy * dt,
        theta: pose.theta + dtheta * dt,
    }
}

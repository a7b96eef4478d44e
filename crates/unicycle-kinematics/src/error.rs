//! Error types for the kinematics library.
//!
//! Steppers themselves never fail; these errors are raised when building
//! controls and simulation parameters from caller-supplied values.

use core::fmt;

/// Errors that can occur when setting up a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Error for an invalid time step.
    /// This variant is returned when `dt` is not finite or not strictly positive.
    InvalidTimeDelta(&'static str),
    /// Error for an invalid turning radius.
    /// This variant is returned when a radius of zero or NaN is used to derive an angular velocity.
    InvalidTurningRadius(&'static str),
    /// Error for NaN or infinite pose or control components.
    NonFiniteInput(&'static str),
    /// Error for an integrator name that does not match any known stepper.
    UnknownIntegrator(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidTimeDelta(msg) => write!(f, "Invalid time delta: {}", msg),
            KinematicsError::InvalidTurningRadius(msg) => {
                write!(f, "Invalid turning radius: {}", msg)
            }
            KinematicsError::NonFiniteInput(msg) => write!(f, "Non-finite input: {}", msg),
            KinematicsError::UnknownIntegrator(msg) => write!(f, "Unknown integrator: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}

//! Trajectory rollout.
//!
//! A rollout starts from an initial pose and repeatedly applies a stepper,
//! feeding each output back as the next input. The resulting trajectory holds
//! `steps + 1` poses, the first of which is the initial pose.

use alloc::vec::Vec;
use core::iter::FusedIterator;

use libm::hypot;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{Control, Integrator, KinematicsError, Pose};

/// Parameters of a fixed-control simulation run.
///
/// Only serializable: deserialized values would bypass the checks in
/// [`SimulationParams::new`].
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    initial: Pose,
    control: Control,
    dt: f64,
    steps: usize,
}

impl SimulationParams {
    /// Construct validated simulation parameters.
    ///
    /// # Arguments
    ///
    /// * `initial`: Starting pose.
    /// * `control`: Velocities applied on every step.
    /// * `dt`: Step length in seconds.
    /// * `steps`: Number of steps to take. Zero yields a trajectory holding
    ///   only the initial pose.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTimeDelta)` if `dt` is not finite or not positive.
    /// Returns `Err(KinematicsError::NonFiniteInput)` if the pose or control holds NaN or infinity.
    pub fn new(
        initial: Pose,
        control: Control,
        dt: f64,
        steps: usize,
    ) -> Result<Self, KinematicsError> {
        if !dt.is_finite() {
            return Err(KinematicsError::InvalidTimeDelta("must be finite"));
        }
        if dt <= 0.0 {
            return Err(KinematicsError::InvalidTimeDelta("must be positive"));
        }
        if !initial.is_finite() {
            return Err(KinematicsError::NonFiniteInput("initial pose"));
        }
        if !control.is_finite() {
            return Err(KinematicsError::NonFiniteInput("control"));
        }
        Ok(SimulationParams {
            initial,
            control,
            dt,
            steps,
        })
    }

    /// Returns the initial pose.
    pub fn initial(&self) -> Pose {
        self.initial
    }

    /// Returns the control applied on every step.
    pub fn control(&self) -> Control {
        self.control
    }

    /// Returns the step length in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the number of steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Total simulated time, `dt * steps`.
    pub fn duration(&self) -> f64 {
        self.dt * self.steps as f64
    }
}

/// An ordered, append-only sequence of poses.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    poses: Vec<Pose>,
}

impl Trajectory {
    /// Start a trajectory at `initial`.
    pub fn new(initial: Pose) -> Self {
        Self::with_capacity(initial, 0)
    }

    /// Start a trajectory at `initial`, reserving room for `steps` more poses.
    pub fn with_capacity(initial: Pose, steps: usize) -> Self {
        let mut poses = Vec::with_capacity(steps.saturating_add(1));
        poses.push(initial);
        Trajectory { poses }
    }

    /// Append the next pose.
    pub fn push(&mut self, pose: Pose) {
        self.poses.push(pose);
    }

    /// Number of poses, including the initial one. Never zero.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Always `false`: a trajectory holds at least its initial pose.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// All poses in order.
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// The initial pose.
    pub fn first(&self) -> Pose {
        self.poses[0]
    }

    /// The most recent pose.
    pub fn last(&self) -> Pose {
        self.poses[self.poses.len() - 1]
    }

    /// Iterator over `(x, y)` positions.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = (f64, f64)> + '_ {
        self.poses.iter().map(Pose::position)
    }

    /// Iterator over x coordinates.
    pub fn xs(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.poses.iter().map(|p| p.x)
    }

    /// Iterator over y coordinates.
    pub fn ys(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.poses.iter().map(|p| p.y)
    }

    /// Iterator over headings, one per pose.
    pub fn headings(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.poses.iter().map(|p| p.theta)
    }

    /// Sum of the straight-line distances between consecutive positions.
    pub fn path_length(&self) -> f64 {
        self.poses
            .windows(2)
            .map(|w| hypot(w[1].x - w[0].x, w[1].y - w[0].y))
            .sum()
    }

    /// Largest Euclidean distance between corresponding positions of two
    /// trajectories, or `None` if their lengths differ.
    pub fn max_deviation(&self, other: &Trajectory) -> Option<f64> {
        if self.len() != other.len() {
            return None;
        }
        Some(
            self.poses
                .iter()
                .zip(other.poses.iter())
                .map(|(a, b)| hypot(a.x - b.x, a.y - b.y))
                .fold(0.0, f64::max),
        )
    }

    /// Consume the trajectory, returning the pose buffer.
    pub fn into_poses(self) -> Vec<Pose> {
        self.poses
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Pose;
    type IntoIter = core::slice::Iter<'a, Pose>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.iter()
    }
}

/// Lazy rollout yielding the initial pose followed by one pose per step.
pub struct Rollout<'a, I: ?Sized> {
    integrator: &'a I,
    control: Control,
    dt: f64,
    next: Pose,
    remaining: usize,
}

impl<I: ?Sized> Clone for Rollout<'_, I> {
    fn clone(&self) -> Self {
        Rollout {
            integrator: self.integrator,
            control: self.control,
            dt: self.dt,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<I: Integrator + ?Sized> Iterator for Rollout<'_, I> {
    type Item = Pose;

    fn next(&mut self) -> Option<Pose> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        if self.remaining > 0 {
            self.next = self.integrator.step(current, self.control, self.dt);
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I: Integrator + ?Sized> ExactSizeIterator for Rollout<'_, I> {}

impl<I: Integrator + ?Sized> FusedIterator for Rollout<'_, I> {}

/// Lazily roll `integrator` forward under `params`.
///
/// Yields exactly `params.steps() + 1` poses. Only the poses actually pulled
/// are computed.
pub fn rollout<'a, I: Integrator + ?Sized>(
    integrator: &'a I,
    params: &SimulationParams,
) -> Rollout<'a, I> {
    Rollout {
        integrator,
        control: params.control,
        dt: params.dt,
        next: params.initial,
        remaining: params.steps.saturating_add(1),
    }
}

/// Run `integrator` for `params.steps()` steps and collect the trajectory.
pub fn simulate<I: Integrator + ?Sized>(integrator: &I, params: &SimulationParams) -> Trajectory {
    let mut trajectory = Trajectory::with_capacity(params.initial, params.steps);
    let mut pose = params.initial;
    for _ in 0..params.steps {
        pose = integrator.step(pose, params.control, params.dt);
        trajectory.push(pose);
    }
    trajectory
}

/// Run `integrator` for `steps` steps with a control chosen per step.
///
/// `control_fn` receives the zero-based step index and the pose at the start
/// of that step. Inputs are not validated.
pub fn simulate_with<I, F>(
    integrator: &I,
    initial: Pose,
    dt: f64,
    steps: usize,
    mut control_fn: F,
) -> Trajectory
where
    I: Integrator + ?Sized,
    F: FnMut(usize, &Pose) -> Control,
{
    let mut trajectory = Trajectory::with_capacity(initial, steps);
    let mut pose = initial;
    for i in 0..steps {
        let control = control_fn(i, &pose);
        pose = integrator.step(pose, control, dt);
        trajectory.push(pose);
    }
    trajectory
}

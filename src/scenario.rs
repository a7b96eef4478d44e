use anyhow::anyhow;
use tracing::{debug, info, info_span};
use unicycle_kinematics::{Chord, Integrator, IntegratorKind, Trajectory, simulate};

use crate::settings::{ScenarioConfig, Settings};

/// Outcome of one simulated scenario.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    pub integrator: IntegratorKind,
    pub trajectory: Trajectory,
    /// Largest position error against the closed-form chord rollout of the
    /// same parameters. Zero when the scenario already uses the chord stepper.
    pub deviation_from_chord: f64,
}

pub fn run_scenario(scenario: &ScenarioConfig) -> anyhow::Result<ScenarioReport> {
    let _span = info_span!("scenario", name = %scenario.name).entered();
    let params = scenario.params()?;
    info!(
        integrator = scenario.integrator.name(),
        control = %params.control(),
        dt = params.dt(),
        steps = params.steps(),
        duration = params.duration(),
        "Simulating"
    );

    let trajectory = simulate(&scenario.integrator, &params);
    for (step, pose) in trajectory.poses().iter().enumerate() {
        debug!(step, x = pose.x, y = pose.y, theta = pose.theta, "pose");
    }

    let deviation_from_chord = if scenario.integrator == IntegratorKind::Chord {
        0.0
    } else {
        let reference = simulate(&Chord, &params);
        trajectory
            .max_deviation(&reference)
            .ok_or_else(|| anyhow!("reference rollout has a different length"))?
    };

    info!(
        final_pose = %trajectory.last(),
        path_length = trajectory.path_length(),
        deviation_from_chord,
        "Scenario complete"
    );

    Ok(ScenarioReport {
        name: scenario.name.clone(),
        integrator: scenario.integrator,
        trajectory,
        deviation_from_chord,
    })
}

pub fn run_all(settings: &Settings) -> anyhow::Result<Vec<ScenarioReport>> {
    settings.scenarios.iter().map(run_scenario).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicycle_kinematics::Pose;

    fn scenario(name: &str, integrator: IntegratorKind, v: f64, radius: f64) -> ScenarioConfig {
        ScenarioConfig {
            name: name.to_string(),
            integrator,
            initial: Pose::new(0.0, 0.0, std::f64::consts::FRAC_PI_4),
            v,
            omega: None,
            radius: Some(radius),
            dt: 0.1,
            steps: 100,
        }
    }

    #[test]
    fn test_run_scenario_chord() {
        let report = run_scenario(&scenario("chord", IntegratorKind::Chord, 1.0, 2.0)).unwrap();
        assert_eq!(report.name, "chord");
        assert_eq!(report.trajectory.len(), 101);
        assert_eq!(report.deviation_from_chord, 0.0);
    }

    #[test]
    fn test_run_scenario_rk4_tracks_chord() {
        let report = run_scenario(&scenario("rk4", IntegratorKind::Rk4, 3.0, 2.0)).unwrap();
        assert_eq!(report.trajectory.len(), 101);
        assert!(report.deviation_from_chord > 0.0);
        assert!(report.deviation_from_chord < 1e-3);
    }

    #[test]
    fn test_run_scenario_euler_drifts() {
        let report = run_scenario(&scenario("euler", IntegratorKind::Euler, 1.0, 2.0)).unwrap();
        assert!(report.deviation_from_chord > 1e-3);
    }

    #[test]
    fn test_run_all_stops_on_invalid_scenario() {
        let settings = Settings {
            scenarios: vec![
                scenario("ok", IntegratorKind::Chord, 1.0, 2.0),
                scenario("bad", IntegratorKind::Chord, 1.0, 0.0),
            ],
        };
        let err = run_all(&settings).unwrap_err();
        assert!(format!("{:#}", err).contains("bad"));
    }

    #[test]
    fn test_same_radius_different_speed_same_circle() {
        // Both speeds trace the same circle of radius 2; the faster run covers more of it.
        let slow = run_scenario(&scenario("slow", IntegratorKind::Chord, 1.0, 2.0)).unwrap();
        let fast = run_scenario(&scenario("fast", IntegratorKind::Chord, 3.0, 2.0)).unwrap();

        // Centre of the circle: start + R * (-sin(theta0), cos(theta0))
        let theta0 = std::f64::consts::FRAC_PI_4;
        let (cx, cy) = (-2.0 * theta0.sin(), 2.0 * theta0.cos());
        for report in [&slow, &fast] {
            for (x, y) in report.trajectory.positions() {
                let r = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                assert!((r - 2.0).abs() < 1e-9);
            }
        }
        assert!(fast.trajectory.path_length() > slow.trajectory.path_length());
    }
}

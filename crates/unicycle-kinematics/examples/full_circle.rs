use core::f64::consts::{FRAC_PI_4, PI};
use unicycle_kinematics::*;

fn main() {
    let velocity = 1.0;
    let turning_radius = 2.0;
    let control = match Control::from_turning_radius(velocity, turning_radius) {
        Ok(control) => control,
        Err(e) => {
            eprintln!("Failed to build control: {}", e);
            return;
        }
    };

    // One full revolution takes 2*PI*R/v seconds.
    let num_steps = 100;
    let dt = 2.0 * PI * turning_radius / velocity / num_steps as f64;
    let initial_pose = Pose::new(0.0, 0.0, FRAC_PI_4);

    let params = match SimulationParams::new(initial_pose, control, dt, num_steps) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Invalid simulation parameters: {}", e);
            return;
        }
    };

    println!("Initializing simulation...");
    println!("  Control:        {}", control);
    println!("  Turning Radius: {} m", turning_radius);
    println!("  Initial Pose:   {}", initial_pose);
    println!("  Time Step:      {:.4} s", dt);
    println!("  Num Steps:      {}", num_steps);
    println!("\nSimulating...");

    for integrator in [IntegratorKind::Chord, IntegratorKind::Rk4, IntegratorKind::Euler] {
        let trajectory = simulate(&integrator, &params);
        let end = trajectory.last();
        let closure_error = (end.x - initial_pose.x).hypot(end.y - initial_pose.y);
        println!(
            "{:>6}: final pose {}, path length {:.4} m, closure error {:.3e} m",
            integrator,
            end,
            trajectory.path_length(),
            closure_error
        );
    }

    println!("\nFirst few poses (chord):");
    for (i, pose) in rollout(&Chord, &params).take(5).enumerate() {
        println!("Step {:>2}: Pose: {}", i, pose);
    }
}

mod scenario;
mod settings;

use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Unicycle simulation started.");

    if let Err(e) = run() {
        error!("Simulation failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let settings = settings::load_settings()?;
    let reports = scenario::run_all(&settings)?;

    for report in &reports {
        info!(
            name = %report.name,
            integrator = %report.integrator,
            poses = report.trajectory.len(),
            final_pose = %report.trajectory.last(),
            deviation_from_chord = report.deviation_from_chord,
            "Summary"
        );
    }
    info!(completed = reports.len(), "All scenarios finished.");
    Ok(())
}

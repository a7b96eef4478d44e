use anyhow::{Context, bail};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use tracing::info;
use unicycle_kinematics::{Control, IntegratorKind, Pose, SimulationParams};

/// Built-in scenarios, compiled into the binary.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");
const LOCAL_CONFIG_PATH: &str = "config/local.toml";
/// Environment variable naming an extra TOML file to layer on top.
pub const CONFIG_PATH_ENV: &str = "UNICYCLE_SIM_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub scenarios: Vec<ScenarioConfig>,
}

/// One simulation run as written in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub integrator: IntegratorKind,
    #[serde(default)]
    pub initial: Pose,
    pub v: f64,
    /// Angular velocity (rad/s). Mutually exclusive with `radius`.
    #[serde(default)]
    pub omega: Option<f64>,
    /// Turning radius (m). Mutually exclusive with `omega`.
    #[serde(default)]
    pub radius: Option<f64>,
    pub dt: f64,
    pub steps: usize,
}

impl ScenarioConfig {
    pub fn control(&self) -> anyhow::Result<Control> {
        match (self.omega, self.radius) {
            (Some(omega), None) => Ok(Control::new(self.v, omega)),
            (None, Some(radius)) => Control::from_turning_radius(self.v, radius)
                .with_context(|| format!("scenario `{}`", self.name)),
            (Some(_), Some(_)) => bail!(
                "scenario `{}` sets both `omega` and `radius`; pick one",
                self.name
            ),
            (None, None) => bail!("scenario `{}` needs one of `omega` or `radius`", self.name),
        }
    }

    pub fn params(&self) -> anyhow::Result<SimulationParams> {
        let control = self.control()?;
        SimulationParams::new(self.initial, control, self.dt, self.steps)
            .with_context(|| format!("scenario `{}`", self.name))
    }
}

impl Settings {
    /// Check that every scenario can be turned into simulation parameters.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scenarios.is_empty() {
            bail!("no scenarios configured");
        }
        for scenario in &self.scenarios {
            scenario.params()?;
        }
        Ok(())
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let override_path = std::env::var(CONFIG_PATH_ENV).ok();
    load_layered(LOCAL_CONFIG_PATH, override_path.as_deref())
}

/// Layer the embedded defaults, an optional local file and an optional
/// required override file. A later source replaces the whole scenario list.
fn load_layered(local_path: &str, override_path: Option<&str>) -> anyhow::Result<Settings> {
    let mut builder = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::new(local_path, FileFormat::Toml).required(false));

    if let Some(path) = override_path {
        info!("Layering configuration from {} ({})", path, CONFIG_PATH_ENV);
        builder = builder.add_source(File::new(path, FileFormat::Toml).required(true));
    }

    let settings: Settings = builder
        .build()
        .and_then(|config| config.try_deserialize())
        .context("loading configuration")?;
    settings.validate().context("validating configuration")?;

    info!(scenarios = settings.scenarios.len(), "Successfully loaded configuration");
    Ok(settings)
}

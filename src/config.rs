use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_PATH: &str = "clawplot.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub plot: PlotConfig,
    pub vector: VectorConfig,
    pub streamline: StreamlineConfig,
}

/// Where the solver output lives and how its files are laid out.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub dir: PathBuf,
    /// Step-0 dump; its leading rows double as the grid header.
    pub header: String,
    pub run_config: String,
    pub parameters: String,
    pub step_prefix: String,
    pub header_lines: usize,
    pub meqn: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width: usize,
    pub height: usize,
    pub interval_ms: u16,
    /// Exclusive upper bound of the cell-centre sequences.
    pub upper: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub output: PathBuf,
    pub vmin: f64,
    pub vmax: f64,
    pub quiver_stride: usize,
    pub colorbar: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StreamlineConfig {
    pub output: PathBuf,
    pub vmin: f64,
    pub vmax: f64,
    pub density: f64,
    pub colorbar: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("_output"),
            header: "fort.q0000".into(),
            run_config: "claw.data".into(),
            parameters: "setprob.data".into(),
            step_prefix: "fort.q".into(),
            header_lines: 8,
            meqn: 4,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            interval_ms: 80,
            upper: 1.0,
        }
    }
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("Results_vector_field_DCU_CFL_0_9.html"),
            vmin: -0.1,
            vmax: 0.1,
            quiver_stride: 2,
            colorbar: false,
        }
    }
}

impl Default for StreamlineConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("Results_streamlines_DCU_CFL_0_9.html"),
            vmin: -0.06,
            vmax: 0.06,
            density: 0.7,
            colorbar: true,
        }
    }
}

impl InputConfig {
    pub fn header_path(&self) -> PathBuf {
        self.dir.join(&self.header)
    }

    pub fn run_config_path(&self) -> PathBuf {
        self.dir.join(&self.run_config)
    }

    pub fn parameters_path(&self) -> PathBuf {
        self.dir.join(&self.parameters)
    }
}

/// Load the config at `path`, falling back to defaults when it is absent or unreadable.
pub fn load(path: &Path) -> Config {
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("failed to parse {}: {e}; using defaults", path.display());
                    Config::default()
                }
            },
            Err(e) => {
                log::warn!("failed to read {}: {e}; using defaults", path.display());
                Config::default()
            }
        }
    } else {
        log::debug!("no {} found; using defaults", path.display());
        Config::default()
    }
}

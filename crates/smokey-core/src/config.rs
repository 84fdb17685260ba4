//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// How a pass splits flow across a cell's neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Every cell behaves as if it had four usable neighbors (0.25 each way).
    #[default]
    Uniform,
    /// Each cell uses its precomputed in/out weights.
    Precomputed,
}

/// Live-tunable simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Frames per engine pass while running (>= 1)
    pub tick_rate: u32,
    /// Emission rate (intended 0.0 to 1.0, not clamped)
    pub emitter_rate: f32,
    /// Escape rate (intended 0.0 to 1.0, not clamped)
    pub escape_rate: f32,
    /// Neighbor weighting mode
    pub weighting: Weighting,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 1,
            emitter_rate: 1.0,
            escape_rate: 1.0,
            weighting: Weighting::Uniform,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 {
            return Err(Error::InvalidConfig(
                "tick_rate must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.emitter_rate) {
            warn!(emitter_rate = self.emitter_rate, "Emitter rate outside [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.escape_rate) {
            warn!(escape_rate = self.escape_rate, "Escape rate outside [0, 1]");
        }
        Ok(())
    }
}

/// Parameters for generating a layout when no file is given
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomLayoutConfig {
    pub rows: u32,
    pub cols: u32,
    /// Chance of an interior cell being a wall (0.0 to 1.0)
    pub wall_density: f32,
    /// Chance of a border cell being an opening (0.0 to 1.0)
    pub escape_density: f32,
}

impl Default for RandomLayoutConfig {
    fn default() -> Self {
        Self {
            rows: 48,
            cols: 64,
            wall_density: 0.1,
            escape_density: 0.05,
        }
    }
}

/// Headless run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Layout file to load; a random layout is generated when absent
    pub layout_path: Option<String>,
    /// Emitter (row, col); defaults to the first floor tile
    pub emitter: Option<(u32, u32)>,
    /// Number of frames to drive
    pub frames: u64,
    /// Stop after this many running frames (0 disables)
    pub breakpoint: u64,
    /// Directory receiving one PPM per completed pass
    pub frame_dir: Option<String>,
    /// Where to write the JSON run report
    pub report_path: Option<String>,
    /// Random seed for generated layouts
    pub seed: u64,
    pub random_layout: RandomLayoutConfig,
    pub sim: SimConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            layout_path: None,
            emitter: None,
            frames: 600,
            breakpoint: 0,
            frame_dir: None,
            report_path: None,
            seed: 0,
            random_layout: RandomLayoutConfig::default(),
            sim: SimConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&text)?;
        config.sim.validate()?;
        Ok(config)
    }
}

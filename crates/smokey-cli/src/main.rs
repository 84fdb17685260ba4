//! Headless driver for the smokey smoke propagation simulator.

mod driver;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use smokey_core::{RunConfig, Weighting};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Smoke propagation with cellular automata", long_about = None)]
struct Cli {
    /// JSON run configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Layout file; a random layout is generated when omitted
    #[arg(long)]
    layout: Option<String>,
    /// Emitter coordinates as ROW,COL
    #[arg(long, value_parser = parse_coords)]
    emitter: Option<(u32, u32)>,
    /// Number of frames to drive
    #[arg(long)]
    frames: Option<u64>,
    /// Stop after this many running frames
    #[arg(long)]
    breakpoint: Option<u64>,
    /// Frames per pass
    #[arg(long)]
    tick_rate: Option<u32>,
    #[arg(long)]
    emitter_rate: Option<f32>,
    #[arg(long)]
    escape_rate: Option<f32>,
    /// Use precomputed neighbor weights instead of uniform quarters
    #[arg(long)]
    precomputed: bool,
    /// Write one PPM per pass into this directory
    #[arg(long)]
    frame_dir: Option<String>,
    /// Write the JSON run report here instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,
    /// Seed for generated layouts
    #[arg(long)]
    seed: Option<u64>,
    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_coords(s: &str) -> std::result::Result<(u32, u32), String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{}'", s))?;
    let row = row.trim().parse().map_err(|e| format!("bad row: {}", e))?;
    let col = col.trim().parse().map_err(|e| format!("bad column: {}", e))?;
    Ok((row, col))
}

impl Cli {
    fn into_config(self) -> Result<(RunConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if self.layout.is_some() {
            config.layout_path = self.layout;
        }
        if self.emitter.is_some() {
            config.emitter = self.emitter;
        }
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        if let Some(breakpoint) = self.breakpoint {
            config.breakpoint = breakpoint;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.sim.tick_rate = tick_rate;
        }
        if let Some(rate) = self.emitter_rate {
            config.sim.emitter_rate = rate;
        }
        if let Some(rate) = self.escape_rate {
            config.sim.escape_rate = rate;
        }
        if self.precomputed {
            config.sim.weighting = Weighting::Precomputed;
        }
        if self.frame_dir.is_some() {
            config.frame_dir = self.frame_dir;
        }
        if let Some(report) = self.report {
            config.report_path = Some(report.to_string_lossy().into_owned());
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.sim.validate()?;
        Ok((config, self.json_logs))
    }
}

fn main() -> Result<()> {
    let (config, json_logs) = Cli::parse().into_config()?;

    telemetry::init_telemetry(json_logs)?;
    info!("Starting smokey");

    let report = driver::run(&config)?;
    let json = serde_json::to_string_pretty(&report)?;
    match &config.report_path {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("failed to write report {}", path))?;
            info!(path = %path, "Report written");
        }
        None => println!("{}", json),
    }

    Ok(())
}

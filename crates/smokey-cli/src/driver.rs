//! Frame loop standing in for an interactive front end.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smokey_core::RunConfig;
use smokey_world::{export, Layout, Simulation, Snapshot};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Outcome of a headless run
#[derive(Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub status: String,
    pub ticks: u64,
    pub frames: u64,
    pub snapshot: Option<Snapshot>,
}

pub fn load_layout(config: &RunConfig) -> Result<Layout> {
    match &config.layout_path {
        Some(path) => {
            Layout::load(path).with_context(|| format!("failed to load layout from {}", path))
        }
        None => {
            info!(seed = config.seed, "No layout file given, generating one");
            Ok(Layout::random(&config.random_layout, config.seed)?)
        }
    }
}

/// Build the simulation and drive it for the configured number of frames.
///
/// Construction and pass failures end up in the report's status rather than
/// an error; only I/O problems abort the run.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    let layout = load_layout(config)?;
    let Some(emitter) = config.emitter.or_else(|| layout.first_floor()) else {
        warn!("Layout has no floor tile to hold the emitter");
        return Ok(RunReport {
            status: "Emitter not on floor tile.".to_string(),
            ticks: 0,
            frames: 0,
            snapshot: None,
        });
    };

    let mut sim = match Simulation::from_layout(&layout, emitter, config.sim) {
        Ok(sim) => sim,
        Err(e) => {
            error!(error = %e, "Simulation construction failed");
            return Ok(RunReport {
                status: e.to_string(),
                ticks: 0,
                frames: 0,
                snapshot: None,
            });
        }
    };
    info!(
        status = "Simulation initialized.",
        rows = layout.rows(),
        cols = layout.cols(),
        ?emitter
    );

    let frame_dir = config.frame_dir.as_ref().map(PathBuf::from);
    if let Some(dir) = &frame_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create frame directory {}", dir.display()))?;
        if config.layout_path.is_none() {
            let path = dir.join("layout.txt");
            std::fs::write(&path, layout.to_text())
                .with_context(|| format!("failed to write layout {}", path.display()))?;
        }
        save(&sim, dir)?;
    }

    let (status, frames) = drive(&mut sim, config, frame_dir.as_deref())?;
    info!(%status, ticks = sim.tick_count(), frames, "Run finished");

    Ok(RunReport {
        status,
        ticks: sim.tick_count(),
        frames,
        snapshot: Some(sim.snapshot()),
    })
}

/// Start `sim` and feed it frames until the budget, a breakpoint or a failed
/// pass ends the run. Returns the final status and the frames consumed.
pub fn drive(
    sim: &mut Simulation,
    config: &RunConfig,
    frame_dir: Option<&Path>,
) -> Result<(String, u64)> {
    sim.start();
    let mut status = "Simulation running.".to_string();
    let mut breakpoint = config.breakpoint;
    let mut frames = 0u64;

    while frames < config.frames {
        frames += 1;
        match sim.advance_frame() {
            Ok(true) => {
                if let Some(dir) = frame_dir {
                    save(sim, dir)?;
                }
            }
            Ok(false) => {}
            Err(e) => {
                if e.is_fatal() {
                    error!(error = %e, frames, "Board state corrupted, run aborted");
                } else {
                    warn!(error = %e, frames, "Pass failed");
                }
                status = e.to_string();
                break;
            }
        }

        if breakpoint > 0 {
            breakpoint -= 1;
            if breakpoint == 0 {
                status = "Breakpoint reached.".to_string();
                sim.stop();
                break;
            }
        }
    }

    if sim.is_running() {
        sim.stop();
        status = "Simulation stopped.".to_string();
    }
    Ok((status, frames))
}

fn save(sim: &Simulation, dir: &Path) -> Result<()> {
    let path = export::save_frame(dir, sim.tick_count(), sim.width(), sim.height(), sim.pixels())?;
    debug!(path = %path.display(), "Frame written");
    Ok(())
}

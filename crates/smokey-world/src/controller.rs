//! Pacing of propagation passes against an external frame driver.

use crate::engine::{propagate, PassParams};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use smokey_core::{Error, Result, SimConfig, Weighting};
use tracing::{debug, trace};

/// Run state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    Stopped,
    Running,
    /// Held only for the duration of [`TickController::step`].
    SteppingOnce,
}

/// Decides on which frames a pass runs and which parameters it runs with.
///
/// The parameters a pass uses are latched at the end of the previous pass (or at
/// construction for the first pass), so live edits take effect one pass late.
#[derive(Debug, Clone)]
pub struct TickController {
    state: ControllerState,
    config: SimConfig,
    frame_skip: u32,
    latched: PassParams,
    ticks: u64,
}

impl TickController {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: ControllerState::Stopped,
            frame_skip: config.tick_rate,
            latched: PassParams::from(&config),
            config,
            ticks: 0,
        })
    }

    pub fn start(&mut self) {
        self.state = ControllerState::Running;
    }

    pub fn stop(&mut self) {
        self.state = ControllerState::Stopped;
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ControllerState::Running
    }

    /// Completed passes since construction
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Frames left before the next paced pass
    pub fn frames_until_pass(&self) -> u32 {
        self.frame_skip
    }

    /// Live configuration (not necessarily what the next pass uses)
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Parameters the next pass will use
    pub fn latched(&self) -> &PassParams {
        &self.latched
    }

    pub fn set_tick_rate(&mut self, tick_rate: u32) -> Result<()> {
        if tick_rate == 0 {
            return Err(Error::InvalidConfig(
                "tick_rate must be at least 1".to_string(),
            ));
        }
        self.config.tick_rate = tick_rate;
        Ok(())
    }

    pub fn set_emitter_rate(&mut self, rate: f32) {
        self.config.emitter_rate = rate;
    }

    pub fn set_escape_rate(&mut self, rate: f32) {
        self.config.escape_rate = rate;
    }

    pub fn set_weighting(&mut self, weighting: Weighting) {
        self.config.weighting = weighting;
    }

    /// Process one external frame. Returns whether a pass ran.
    pub fn advance_frame(&mut self, grid: &mut Grid) -> Result<bool> {
        match self.state {
            ControllerState::Stopped => return Ok(false),
            ControllerState::Running => {
                self.frame_skip -= 1;
                if self.frame_skip != 0 {
                    trace!(frames_left = self.frame_skip, "Frame skipped");
                    return Ok(false);
                }
                self.frame_skip = self.config.tick_rate;
            }
            ControllerState::SteppingOnce => {}
        }

        self.run_pass(grid)?;
        Ok(true)
    }

    /// Run exactly one pass regardless of pacing, then stop.
    pub fn step(&mut self, grid: &mut Grid) -> Result<()> {
        self.state = ControllerState::SteppingOnce;
        let result = self.advance_frame(grid);
        self.state = ControllerState::Stopped;
        result.map(|_| ())
    }

    fn run_pass(&mut self, grid: &mut Grid) -> Result<()> {
        propagate(grid, &self.latched)?;
        self.ticks += 1;
        self.latched = PassParams::from(&self.config);
        debug!(tick = self.ticks, state = ?self.state, "Pass complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        let mut grid = Grid::from_codes(3, 1, &[0, 0, 0]).unwrap();
        grid.place_emitter(0, 0).unwrap();
        grid.compute_weights();
        grid
    }

    #[test]
    fn test_initial_state() {
        let controller = TickController::new(SimConfig::default()).unwrap();
        assert_eq!(controller.state(), ControllerState::Stopped);
        assert!(!controller.is_running());
        assert_eq!(controller.tick_count(), 0);
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let config = SimConfig {
            tick_rate: 0,
            ..Default::default()
        };
        assert!(TickController::new(config).is_err());

        let mut controller = TickController::new(SimConfig::default()).unwrap();
        assert!(controller.set_tick_rate(0).is_err());
        assert_eq!(controller.config().tick_rate, 1);
    }

    #[test]
    fn test_stopped_frames_are_noops() {
        let mut grid = corridor();
        let mut controller = TickController::new(SimConfig {
            tick_rate: 3,
            ..Default::default()
        })
        .unwrap();
        for _ in 0..10 {
            assert!(!controller.advance_frame(&mut grid).unwrap());
        }
        assert_eq!(controller.tick_count(), 0);
        assert_eq!(controller.frames_until_pass(), 3);
        assert_eq!(grid.cell(0, 1).unwrap().density, 0.0);
    }

    #[test]
    fn test_pacing_one_pass_per_tick_rate_frames() {
        let mut grid = corridor();
        let mut controller = TickController::new(SimConfig {
            tick_rate: 4,
            ..Default::default()
        })
        .unwrap();
        controller.start();

        let fired: Vec<bool> = (0..12)
            .map(|_| controller.advance_frame(&mut grid).unwrap())
            .collect();
        assert_eq!(
            fired,
            vec![false, false, false, true, false, false, false, true, false, false, false, true]
        );
        assert_eq!(controller.tick_count(), 3);
    }

    #[test]
    fn test_tick_rate_change_applies_after_next_pass() {
        let mut grid = corridor();
        let mut controller = TickController::new(SimConfig {
            tick_rate: 2,
            ..Default::default()
        })
        .unwrap();
        controller.start();

        assert!(!controller.advance_frame(&mut grid).unwrap());
        controller.set_tick_rate(3).unwrap();
        // The pending countdown was seeded with the old rate.
        assert!(controller.advance_frame(&mut grid).unwrap());
        assert!(!controller.advance_frame(&mut grid).unwrap());
        assert!(!controller.advance_frame(&mut grid).unwrap());
        assert!(controller.advance_frame(&mut grid).unwrap());
    }

    #[test]
    fn test_step_ignores_and_preserves_counter() {
        let mut grid = corridor();
        let mut controller = TickController::new(SimConfig {
            tick_rate: 5,
            ..Default::default()
        })
        .unwrap();
        controller.start();
        controller.advance_frame(&mut grid).unwrap();
        controller.advance_frame(&mut grid).unwrap();
        assert_eq!(controller.frames_until_pass(), 3);

        controller.step(&mut grid).unwrap();
        assert_eq!(controller.tick_count(), 1);
        assert_eq!(controller.frames_until_pass(), 3);
        assert_eq!(controller.state(), ControllerState::Stopped);

        controller.step(&mut grid).unwrap();
        assert_eq!(controller.tick_count(), 2);
    }

    #[test]
    fn test_stop_takes_effect_before_next_frame() {
        let mut grid = corridor();
        let mut controller = TickController::new(SimConfig::default()).unwrap();
        controller.start();
        assert!(controller.advance_frame(&mut grid).unwrap());
        controller.stop();
        assert!(!controller.advance_frame(&mut grid).unwrap());
        assert_eq!(controller.tick_count(), 1);
    }

    #[test]
    fn test_rate_changes_have_one_pass_latency() {
        let mut grid = Grid::from_codes(2, 1, &[0, 0]).unwrap();
        grid.place_emitter(0, 0).unwrap();
        grid.compute_weights();
        let mut controller = TickController::new(SimConfig::default()).unwrap();

        // Pass 1 runs with the construction-time rate of 1.0 despite the edit.
        controller.set_emitter_rate(0.0);
        assert_eq!(controller.latched().emitter_rate, 1.0);
        controller.step(&mut grid).unwrap();
        assert_eq!(grid.cell(0, 1).unwrap().density, 0.25);

        // Pass 2 picks up the rate latched at the end of pass 1.
        assert_eq!(controller.latched().emitter_rate, 0.0);
        controller.step(&mut grid).unwrap();
        assert_eq!(grid.cell(0, 1).unwrap().density, 0.25);
    }

    #[test]
    fn test_weighting_change_has_one_pass_latency() {
        let mut controller = TickController::new(SimConfig::default()).unwrap();
        let mut grid = corridor();
        controller.set_weighting(Weighting::Precomputed);
        assert_eq!(controller.latched().weighting, Weighting::Uniform);
        controller.step(&mut grid).unwrap();
        assert_eq!(controller.latched().weighting, Weighting::Precomputed);
    }

    #[test]
    fn test_failed_pass_does_not_count() {
        let mut grid = corridor();
        grid.corrupt_for_test();
        let mut controller = TickController::new(SimConfig::default()).unwrap();
        controller.start();
        assert!(controller.advance_frame(&mut grid).is_err());
        assert_eq!(controller.tick_count(), 0);
        assert_eq!(controller.frames_until_pass(), 1);
    }
}

//! Simulation instance: a board plus the controller that drives it.

use crate::controller::{ControllerState, TickController};
use crate::grid::Grid;
use crate::layout::Layout;
use serde::{Deserialize, Serialize};
use smokey_core::{Result, SimConfig, Weighting};
use tracing::{error, info, instrument};

pub struct Simulation {
    grid: Grid,
    controller: TickController,
}

impl Simulation {
    /// Build a board from elevation codes, place the emitter and precompute
    /// neighbor weights. Nothing is returned on failure.
    #[instrument(skip(codes, config), fields(cells = codes.len()))]
    pub fn new(
        width: u32,
        height: u32,
        codes: &[i32],
        emitter_row: u32,
        emitter_col: u32,
        config: SimConfig,
    ) -> Result<Self> {
        let controller = TickController::new(config)?;
        let mut grid = Grid::from_codes(width, height, codes)?;
        grid.place_emitter(emitter_row, emitter_col)?;
        grid.compute_weights();

        info!(width, height, emitter_row, emitter_col, "Simulation initialized");
        Ok(Self { grid, controller })
    }

    pub fn from_layout(layout: &Layout, emitter: (u32, u32), config: SimConfig) -> Result<Self> {
        Self::new(
            layout.cols(),
            layout.rows(),
            layout.codes(),
            emitter.0,
            emitter.1,
            config,
        )
    }

    pub fn start(&mut self) {
        self.controller.start();
    }

    pub fn stop(&mut self) {
        self.controller.stop();
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn tick_count(&self) -> u64 {
        self.controller.tick_count()
    }

    /// Process one external frame. Returns whether a pass ran.
    ///
    /// A failed pass stops the simulation before the error is returned.
    pub fn advance_frame(&mut self) -> Result<bool> {
        let result = self.controller.advance_frame(&mut self.grid);
        self.halt_on_error(result)
    }

    /// Run exactly one pass and leave the simulation stopped.
    pub fn step(&mut self) -> Result<()> {
        let result = self.controller.step(&mut self.grid);
        self.halt_on_error(result)
    }

    fn halt_on_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            error!(tick = self.tick_count(), error = %e, "Pass failed, stopping simulation");
            self.controller.stop();
        }
        result
    }

    pub fn config(&self) -> &SimConfig {
        self.controller.config()
    }

    pub fn set_tick_rate(&mut self, tick_rate: u32) -> Result<()> {
        self.controller.set_tick_rate(tick_rate)
    }

    pub fn set_emitter_rate(&mut self, rate: f32) {
        self.controller.set_emitter_rate(rate);
    }

    pub fn set_escape_rate(&mut self, rate: f32) {
        self.controller.set_escape_rate(rate);
    }

    pub fn set_weighting(&mut self, weighting: Weighting) {
        self.controller.set_weighting(weighting);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// RGBA8 frame, four bytes per cell, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.grid.pixels()
    }

    /// Drop half the board's cells so the next pass hits a missing cell.
    #[cfg(any(test, feature = "test-util"))]
    pub fn corrupt_for_test(&mut self) {
        self.grid.corrupt_for_test();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick_count(),
            width: self.grid.width(),
            height: self.grid.height(),
            densities: self.grid.densities(),
        }
    }
}

/// Density readout of a board at a given tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub densities: Vec<f32>,
}

impl Snapshot {
    pub fn density_at(&self, row: u32, col: u32) -> Option<f32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.densities
            .get(row as usize * self.width as usize + col as usize)
            .copied()
    }
}

//! One propagation pass over the board.
//!
//! Cells are visited in raster order and updated in place, so a neighbor above
//! or to the left already carries this pass's density while one below or to the
//! right still carries the previous pass's. Numeric results depend on this order.

use crate::cell::{Cell, EMITTER_DENSITY};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use smokey_core::{
    density_luminance, unit_to_byte, CellType, Direction, Error, Result, Rgba, SimConfig,
    Weighting,
};
use tracing::error;

/// Parameters held constant for the whole of one pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassParams {
    pub emitter_rate: f32,
    pub escape_rate: f32,
    pub weighting: Weighting,
}

impl From<&SimConfig> for PassParams {
    fn from(config: &SimConfig) -> Self {
        Self {
            emitter_rate: config.emitter_rate,
            escape_rate: config.escape_rate,
            weighting: config.weighting,
        }
    }
}

/// Run one pass, mutating floor densities and refreshing the pixel buffer.
///
/// Fails with [`Error::MissingCell`] if a location inside the board has no
/// cell; the board is then only partially updated and must not be trusted.
pub fn propagate(grid: &mut Grid, params: &PassParams) -> Result<()> {
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let Some(subject) = grid.cell(row, col).copied() else {
                error!(row, col, "Board lookup failed inside its own bounds");
                return Err(Error::MissingCell { row, col });
            };

            match subject.cell_type {
                CellType::Wall => {}
                CellType::Floor => {
                    let (intake, outtake) = exchange(grid, &subject, params);
                    let cell = grid
                        .cell_mut(row, col)
                        .ok_or(Error::MissingCell { row, col })?;
                    cell.intake = intake;
                    cell.outtake = outtake;
                    cell.density += intake - outtake;
                    let l = density_luminance(cell.density);
                    grid.write_pixel(row, col, Rgba::rgb(l, l, l));
                }
                CellType::Emitter => {
                    let l = unit_to_byte(params.emitter_rate);
                    grid.write_pixel(row, col, Rgba::rgb(l, 255 - l, 255 - l));
                }
                CellType::Escape => {
                    let l = unit_to_byte(params.escape_rate);
                    grid.write_pixel(row, col, Rgba::rgb(255 - l, 255 - l, l));
                }
            }
        }
    }
    Ok(())
}

/// Total (intake, outtake) of a floor cell against its neighbors.
fn exchange(grid: &Grid, subject: &Cell, params: &PassParams) -> (f32, f32) {
    let (row, col) = (subject.row, subject.col);
    let (s_in, s_out) = subject.weights(params.weighting);
    let s_density = subject.density;

    let mut intake = 0.0f32;
    let mut outtake = 0.0f32;
    for dir in Direction::all() {
        let Some(adj) = grid.neighbor(dir, row, col) else {
            continue;
        };
        let (n_in, n_out) = adj.weights(params.weighting);

        // Flow from the subject into the neighbor, and back.
        let (to_adj, from_adj) = match adj.cell_type {
            CellType::Wall => (0.0, 0.0),
            CellType::Floor => (
                (s_out * s_density).min(n_in * (1.0 - adj.density)),
                (n_out * adj.density).min(s_in * (1.0 - s_density)),
            ),
            CellType::Emitter => (
                0.0,
                params.emitter_rate * (n_out * EMITTER_DENSITY).min(s_in * (1.0 - s_density)),
            ),
            CellType::Escape => (params.escape_rate * s_out * s_density, 0.0),
        };

        intake += from_adj;
        outtake += to_adj;
    }
    (intake, outtake)
}

//! Per-location cell state.

use serde::{Deserialize, Serialize};
use smokey_core::{CellType, Weighting};

/// Density of the emitter cell; it never changes.
pub const EMITTER_DENSITY: f32 = 1.0;

/// Weight used for both roles when weighting is uniform.
pub const UNIFORM_WEIGHT: f32 = 0.25;

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    /// Elevation code in [-1, 10]
    pub code: i8,
    pub row: u32,
    pub col: u32,
    /// Share of flow received per eligible neighbor
    pub weight_in: f32,
    /// Share of flow sent per eligible neighbor
    pub weight_out: f32,
    pub density: f32,
    /// Flow gathered during the last pass
    pub intake: f32,
    /// Flow released during the last pass
    pub outtake: f32,
}

impl Cell {
    pub fn new(row: u32, col: u32, raw_code: i32) -> Self {
        let (cell_type, code) = CellType::classify(raw_code);
        Self {
            cell_type,
            code,
            row,
            col,
            weight_in: 0.0,
            weight_out: 0.0,
            density: 0.0,
            intake: 0.0,
            outtake: 0.0,
        }
    }

    /// Whether this cell may be promoted to the emitter.
    pub fn accepts_emitter(&self) -> bool {
        self.cell_type == CellType::Floor && (0..=9).contains(&self.code)
    }

    /// Promote to the emitter, pinning density at 1.
    pub(crate) fn promote_to_emitter(&mut self) {
        self.cell_type = CellType::Emitter;
        self.density = EMITTER_DENSITY;
    }

    /// (in, out) weights under the given weighting mode.
    #[inline]
    pub fn weights(&self, weighting: Weighting) -> (f32, f32) {
        match weighting {
            Weighting::Precomputed => (self.weight_in, self.weight_out),
            Weighting::Uniform => (UNIFORM_WEIGHT, UNIFORM_WEIGHT),
        }
    }
}

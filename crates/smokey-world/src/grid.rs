//! 2D board of classified cells and its RGBA projection.

use crate::cell::Cell;
use smokey_core::{CellType, Direction, Error, Result, Rgba, MAX_BOARD_SIDE};
use tracing::{debug, info};

/// A bounded (non-wrapping) row-major board
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    pixels: Vec<u8>,
}

impl Grid {
    /// Classify a row-major slice of elevation codes into a board.
    pub fn from_codes(width: u32, height: u32, codes: &[i32]) -> Result<Self> {
        let size = width as usize * height as usize;
        if width == 0
            || height == 0
            || width > MAX_BOARD_SIDE
            || height > MAX_BOARD_SIDE
            || codes.len() != size
        {
            return Err(Error::InvalidDimensions {
                width,
                height,
                cells: codes.len(),
            });
        }

        let mut cells = Vec::with_capacity(size);
        let mut pixels = Vec::with_capacity(size * 4);
        for (index, &code) in codes.iter().enumerate() {
            let row = (index / width as usize) as u32;
            let col = (index % width as usize) as u32;
            let cell = Cell::new(row, col, code);
            pixels.extend_from_slice(&Rgba::for_cell(cell.cell_type).0);
            cells.push(cell);
        }

        debug!(width, height, "Board classified");
        Ok(Self {
            width,
            height,
            cells,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index_of(&self, row: u32, col: u32) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row as usize * self.width as usize + col as usize)
        } else {
            None
        }
    }

    /// Cell at (row, col), or `None` past the edge.
    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.index_of(row, col).and_then(|i| self.cells.get(i))
    }

    pub(crate) fn cell_mut(&mut self, row: u32, col: u32) -> Option<&mut Cell> {
        self.index_of(row, col).and_then(move |i| self.cells.get_mut(i))
    }

    /// Coordinates of the neighbor in `dir`, or `None` at the board edge.
    pub fn neighbor_coords(&self, dir: Direction, row: u32, col: u32) -> Option<(u32, u32)> {
        let (dr, dc) = dir.to_delta();
        let r = row as i64 + dr;
        let c = col as i64 + dc;
        if r < 0 || c < 0 || r >= self.height as i64 || c >= self.width as i64 {
            return None;
        }
        Some((r as u32, c as u32))
    }

    /// Neighbor of (row, col) in `dir`, or `None` at the board edge.
    pub fn neighbor(&self, dir: Direction, row: u32, col: u32) -> Option<&Cell> {
        self.neighbor_coords(dir, row, col)
            .and_then(|(r, c)| self.cell(r, c))
    }

    /// Promote the floor tile at (row, col) to the emitter.
    pub(crate) fn place_emitter(&mut self, row: u32, col: u32) -> Result<()> {
        let (width, height) = (self.width, self.height);
        let cell = self.cell_mut(row, col).ok_or(Error::OutOfBounds {
            row,
            col,
            width,
            height,
        })?;
        if !cell.accepts_emitter() {
            return Err(Error::InvalidEmitterPlacement {
                row,
                col,
                code: cell.code,
            });
        }
        cell.promote_to_emitter();
        self.write_pixel(row, col, Rgba::EMITTER);
        info!(row, col, "Emitter placed");
        Ok(())
    }

    /// Count how many neighbors can feed into and drain out of each cell and
    /// derive the per-neighbor shares from those counts.
    pub(crate) fn compute_weights(&mut self) {
        for index in 0..self.cells.len() {
            let (row, col) = (self.cells[index].row, self.cells[index].col);
            let mut ins = 0u8;
            let mut outs = 0u8;
            for dir in Direction::all() {
                if let Some(adj) = self.neighbor(dir, row, col) {
                    if adj.cell_type.is_input() {
                        ins += 1;
                    }
                    if adj.cell_type.is_output() {
                        outs += 1;
                    }
                }
            }
            let cell = &mut self.cells[index];
            cell.weight_in = if ins == 0 { 0.0 } else { 1.0 / ins as f32 };
            cell.weight_out = if outs == 0 { 0.0 } else { 1.0 / outs as f32 };
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterator over cells of a given type
    pub fn cells_of(&self, cell_type: CellType) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(move |c| c.cell_type == cell_type)
    }

    pub fn emitter(&self) -> Option<&Cell> {
        self.cells_of(CellType::Emitter).next()
    }

    /// Row-major density values
    pub fn densities(&self) -> Vec<f32> {
        self.cells.iter().map(|c| c.density).collect()
    }

    /// RGBA8 bytes, four per cell, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, row: u32, col: u32) -> Option<Rgba> {
        let i = self.index_of(row, col)? * 4;
        let bytes = self.pixels.get(i..i + 4)?;
        Some(Rgba([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn write_pixel(&mut self, row: u32, col: u32, color: Rgba) {
        if let Some(i) = self.index_of(row, col) {
            self.pixels[i * 4..i * 4 + 4].copy_from_slice(&color.0);
        }
    }

    #[cfg(any(test, feature = "test-util"))]
    pub(crate) fn corrupt_for_test(&mut self) {
        self.cells.truncate(self.cells.len() / 2);
    }
}

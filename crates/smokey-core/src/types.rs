//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};

/// Largest supported board side, in cells.
pub const MAX_BOARD_SIDE: u32 = 512;

/// Elevation code of a wall cell.
pub const WALL_CODE: i8 = -1;

/// Elevation code of an escape cell.
pub const ESCAPE_CODE: i8 = 10;

/// Static classification of a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Wall,
    Floor,
    Emitter,
    Escape,
}

impl CellType {
    /// Classify a raw elevation code. Codes outside [-1, 10] are clamped first.
    pub fn classify(code: i32) -> (CellType, i8) {
        let code = clamp_code(code);
        let cell_type = match code {
            WALL_CODE => CellType::Wall,
            ESCAPE_CODE => CellType::Escape,
            _ => CellType::Floor,
        };
        (cell_type, code)
    }

    /// Whether a neighbor of this type can push flow into its neighbor.
    pub fn is_input(self) -> bool {
        matches!(self, CellType::Floor | CellType::Emitter)
    }

    /// Whether a neighbor of this type can absorb flow from its neighbor.
    pub fn is_output(self) -> bool {
        matches!(self, CellType::Floor | CellType::Escape)
    }
}

/// Clamp an elevation code into [-1, 10].
pub fn clamp_code(code: i32) -> i8 {
    code.clamp(WALL_CODE as i32, ESCAPE_CODE as i32) as i8
}

/// Orthogonal direction, in the order the engine visits neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Row/column offset of the neighbor in this direction.
    pub fn to_delta(&self) -> (i64, i64) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }

    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::West,
            Direction::East,
        ]
    }
}

/// An RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WALL: Rgba = Rgba::from_u32(0x4D5D53FF);
    pub const FLOOR: Rgba = Rgba::from_u32(0xFFFFFFFF);
    pub const ESCAPE: Rgba = Rgba::from_u32(0x0000FFFF);
    pub const EMITTER: Rgba = Rgba::from_u32(0xFF0000FF);

    /// Build from a packed `0xRRGGBBAA` value.
    pub const fn from_u32(rgba: u32) -> Self {
        Self(rgba.to_be_bytes())
    }

    /// Opaque color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 0xFF])
    }

    /// Palette entry for a freshly classified cell.
    pub fn for_cell(cell_type: CellType) -> Self {
        match cell_type {
            CellType::Wall => Rgba::WALL,
            CellType::Floor => Rgba::FLOOR,
            CellType::Emitter => Rgba::EMITTER,
            CellType::Escape => Rgba::ESCAPE,
        }
    }
}

/// Scale a unit value to a byte; the float-to-int cast saturates.
pub fn unit_to_byte(value: f32) -> u8 {
    (255.0 * value) as u8
}

/// Grayscale luminance for a floor cell: dense smoke is dark.
pub fn density_luminance(density: f32) -> u8 {
    (255.0 - 255.0 * density) as u8
}

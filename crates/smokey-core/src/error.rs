//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Emitter coordinates out of bounds: ({row}, {col}) is outside a {width}x{height} board.")]
    OutOfBounds {
        row: u32,
        col: u32,
        width: u32,
        height: u32,
    },

    #[error("Emitter not on floor tile: ({row}, {col}) has elevation code {code}.")]
    InvalidEmitterPlacement { row: u32, col: u32, code: i8 },

    #[error("Invalid board dimensions {width}x{height} for {cells} cells.")]
    InvalidDimensions { width: u32, height: u32, cells: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid character '{ch}' ({code}) detected at {row}, {col}.")]
    InvalidCharacter {
        ch: char,
        code: u32,
        row: usize,
        col: usize,
    },

    #[error("Each row must have the same number of columns: row {row} has {found}, expected {expected}.")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("The layout must not be empty.")]
    EmptyLayout,

    #[error("The layout must not exceed a size of 512x512 cells (got {rows}x{cols}).")]
    LayoutTooLarge { rows: usize, cols: usize },

    #[error("Unexpected missing cell in valid location ({row}, {col}).")]
    MissingCell { row: u32, col: u32 },
}

impl Error {
    /// Whether this error means the board state can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::MissingCell { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

//! Text board layouts.
//!
//! One line per row, one character per cell. A character's code minus `'0'` is
//! its elevation code: `/` is a wall, `0`-`9` are floor heights and `:` is an
//! opening to the outside.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smokey_core::{
    CellType, Error, RandomLayoutConfig, Result, ESCAPE_CODE, MAX_BOARD_SIDE, WALL_CODE,
};
use std::path::Path;
use tracing::{debug, info};

const CODE_OFFSET: u32 = 0x30;
const MIN_CHAR: char = '/';
const MAX_CHAR: char = ':';

/// A validated rectangular layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    rows: u32,
    cols: u32,
    codes: Vec<i32>,
}

impl Layout {
    pub fn parse(text: &str) -> Result<Self> {
        let mut codes = Vec::new();
        let mut rows = 0usize;
        let mut cols = 0usize;

        for (row, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut width = 0usize;
            for (col, ch) in line.chars().enumerate() {
                if !(MIN_CHAR..=MAX_CHAR).contains(&ch) {
                    return Err(Error::InvalidCharacter {
                        ch,
                        code: ch as u32,
                        row: row + 1,
                        col,
                    });
                }
                codes.push(ch as i32 - CODE_OFFSET as i32);
                width += 1;
            }
            if row > 0 && width != cols {
                return Err(Error::RaggedRows {
                    row: row + 1,
                    expected: cols,
                    found: width,
                });
            }
            cols = width;
            rows += 1;
        }

        if rows == 0 || cols == 0 {
            return Err(Error::EmptyLayout);
        }
        if rows > MAX_BOARD_SIDE as usize || cols > MAX_BOARD_SIDE as usize {
            return Err(Error::LayoutTooLarge { rows, cols });
        }

        debug!(rows, cols, "Layout parsed");
        Ok(Self {
            rows: rows as u32,
            cols: cols as u32,
            codes,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let layout = Self::parse(&text)?;
        info!(path = %path.display(), rows = layout.rows, cols = layout.cols, "Layout loaded");
        Ok(layout)
    }

    /// Generate a walled board with random openings, interior walls and floor
    /// heights. The same seed always yields the same layout.
    pub fn random(config: &RandomLayoutConfig, seed: u64) -> Result<Self> {
        let (rows, cols) = (config.rows, config.cols);
        if rows < 3 || cols < 3 || rows > MAX_BOARD_SIDE || cols > MAX_BOARD_SIDE {
            return Err(Error::InvalidConfig(format!(
                "random layout must be between 3x3 and {0}x{0}, got {1}x{2}",
                MAX_BOARD_SIDE, rows, cols
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut codes = Vec::with_capacity(rows as usize * cols as usize);
        for row in 0..rows {
            for col in 0..cols {
                let corner = (row == 0 || row == rows - 1) && (col == 0 || col == cols - 1);
                let border = row == 0 || row == rows - 1 || col == 0 || col == cols - 1;
                let roll = rng.gen::<f32>();

                let code = if corner {
                    WALL_CODE as i32
                } else if border {
                    if roll < config.escape_density {
                        ESCAPE_CODE as i32
                    } else {
                        WALL_CODE as i32
                    }
                } else if roll < config.wall_density {
                    WALL_CODE as i32
                } else {
                    rng.gen_range(0..=9)
                };
                codes.push(code);
            }
        }

        Ok(Self { rows, cols, codes })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Row-major elevation codes
    pub fn codes(&self) -> &[i32] {
        &self.codes
    }

    /// First tile in raster order that can hold the emitter.
    pub fn first_floor(&self) -> Option<(u32, u32)> {
        self.codes
            .iter()
            .position(|&c| CellType::classify(c).0 == CellType::Floor)
            .map(|i| (i as u32 / self.cols, i as u32 % self.cols))
    }

    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.codes.len() + self.rows as usize);
        for row in self.codes.chunks(self.cols as usize) {
            for &code in row {
                let code = code.clamp(WALL_CODE as i32, ESCAPE_CODE as i32);
                text.push(char::from((code + CODE_OFFSET as i32) as u8));
            }
            text.push('\n');
        }
        text
    }
}

//! Smoke propagation engine.
//!
//! This module implements the 2D board of typed cells, the per-tick flow exchange
//! between orthogonal neighbors, and the controller that paces passes against an
//! external frame driver.

pub mod cell;
pub mod grid;
pub mod engine;
pub mod controller;
pub mod simulation;
pub mod layout;
pub mod export;

pub use cell::Cell;
pub use grid::Grid;
pub use engine::{propagate, PassParams};
pub use controller::{ControllerState, TickController};
pub use simulation::{Simulation, Snapshot};
pub use layout::Layout;

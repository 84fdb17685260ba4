//! End-to-end behavior of simulations built from text layouts.

use smokey_core::{CellType, Error, Result, SimConfig, Weighting};
use smokey_world::{Layout, Simulation};

fn simulation(text: &str, emitter: (u32, u32), config: SimConfig) -> Result<Simulation> {
    let layout = Layout::parse(text)?;
    Simulation::from_layout(&layout, emitter, config)
}

#[test]
fn single_row_cascades_within_one_pass() {
    let mut sim = simulation("000\n", (0, 0), SimConfig::default()).unwrap();
    sim.step().unwrap();

    let snap = sim.snapshot();
    assert_eq!(snap.densities, vec![1.0, 0.25, 0.0625]);
    assert_eq!(sim.tick_count(), 1);
    assert!(!sim.is_running());
}

#[test]
fn emitter_on_wall_is_rejected() {
    let result = simulation("0/0\n", (0, 1), SimConfig::default());
    assert!(matches!(result, Err(Error::InvalidEmitterPlacement { row: 0, col: 1, .. })));
}

#[test]
fn emitter_outside_board_is_rejected() {
    let result = simulation("000\n000\n", (2, 0), SimConfig::default());
    assert!(matches!(result, Err(Error::OutOfBounds { row: 2, col: 0, .. })));
    let result = simulation("000\n000\n", (0, 3), SimConfig::default());
    assert!(matches!(result, Err(Error::OutOfBounds { .. })));
}

#[test]
fn emitter_stays_saturated() {
    let text = "/////\n/000:\n/010/\n/000/\n/////\n";
    for weighting in [Weighting::Uniform, Weighting::Precomputed] {
        let config = SimConfig {
            weighting,
            ..Default::default()
        };
        let mut sim = simulation(text, (2, 2), config).unwrap();
        sim.start();
        for _ in 0..500 {
            sim.advance_frame().unwrap();
            assert_eq!(sim.grid().emitter().unwrap().density, 1.0);
        }
        assert_eq!(sim.tick_count(), 500);
    }
}

#[test]
fn smoke_reaches_every_connected_floor() {
    let text = "/////\n/000:\n/0/0/\n/000/\n/////\n";
    let mut sim = simulation(text, (1, 1), SimConfig::default()).unwrap();
    for _ in 0..50 {
        sim.step().unwrap();
    }
    for cell in sim.grid().cells_of(CellType::Floor) {
        assert!(cell.density > 0.0, "({}, {}) never filled", cell.row, cell.col);
        assert!(cell.density <= 1.0 + 1e-5);
    }
    for cell in sim.grid().cells_of(CellType::Wall) {
        assert_eq!(cell.density, 0.0);
    }
}

#[test]
fn weights_are_reciprocal_neighbor_counts() {
    let layout = Layout::random(
        &smokey_core::RandomLayoutConfig {
            rows: 16,
            cols: 16,
            wall_density: 0.3,
            escape_density: 0.3,
        },
        99,
    )
    .unwrap();
    let emitter = layout.first_floor().unwrap();
    let sim = Simulation::from_layout(&layout, emitter, SimConfig::default()).unwrap();
    let grid = sim.grid();

    for cell in grid.cells() {
        let mut ins = 0;
        let mut outs = 0;
        for dir in smokey_core::Direction::all() {
            if let Some(adj) = grid.neighbor(dir, cell.row, cell.col) {
                ins += adj.cell_type.is_input() as u32;
                outs += adj.cell_type.is_output() as u32;
            }
        }
        let expect = |n: u32| if n == 0 { 0.0 } else { 1.0 / n as f32 };
        assert_eq!(cell.weight_in, expect(ins));
        assert_eq!(cell.weight_out, expect(outs));
    }
}

#[test]
fn paced_run_matches_stepped_run() {
    let text = "0000\n0/00\n000:\n";
    let config = SimConfig {
        tick_rate: 3,
        ..Default::default()
    };
    let mut paced = simulation(text, (0, 0), config).unwrap();
    let mut stepped = simulation(text, (0, 0), config).unwrap();

    paced.start();
    for _ in 0..30 {
        paced.advance_frame().unwrap();
    }
    for _ in 0..10 {
        stepped.step().unwrap();
    }

    assert_eq!(paced.tick_count(), 10);
    assert_eq!(paced.snapshot().densities, stepped.snapshot().densities);
    assert_eq!(paced.pixels(), stepped.pixels());
}

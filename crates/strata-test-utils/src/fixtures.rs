//! A root universe holding one lattice of pin cells.
//!
//! Layout for `TwoLevelGeometry::build(3, 3, 1.26, 0.4)`:
//!
//! ```text
//! root (0) ── fill square ──> lattice (1)
//!                               ├─ (0,0) pin 100
//!                               ├─ (1,0) pin 101
//!                               ...
//!                               └─ (2,2) pin 108
//! ```
//!
//! Each lattice cell gets its own pin universe, `100 + y * num_x + x`, so a
//! query result identifies the grid cell it came from.

use strata_core::{Point, UniverseId};
use strata_universe::UniverseTable;

use crate::{pin_cell_universe, square_fill, PinCells, FUEL, MODERATOR};

/// Root universe id of the fixture.
pub const ROOT: UniverseId = UniverseId(0);
/// Lattice id of the fixture.
pub const LATTICE: UniverseId = UniverseId(1);

/// A built and bound two-level geometry.
pub struct TwoLevelGeometry {
    pub table: UniverseTable,
    pub num_x: usize,
    pub num_y: usize,
    pub pitch: f64,
    pub radius: f64,
    /// Pin universes, bottom row first.
    pub pins: Vec<PinCells>,
}

impl TwoLevelGeometry {
    pub fn build(num_x: usize, num_y: usize, pitch: f64, radius: f64) -> Self {
        let mut table = UniverseTable::default();
        let root = table.create_universe(Some(ROOT)).unwrap();
        let lattice = table.create_lattice(Some(LATTICE), pitch, pitch).unwrap();

        let pins: Vec<PinCells> = (0..num_x * num_y)
            .map(|i| {
                let id = UniverseId(100 + i as u32);
                pin_cell_universe(&mut table, Some(id), radius, FUEL, MODERATOR)
            })
            .collect();

        let mut top_down = Vec::with_capacity(pins.len());
        for y in (0..num_y).rev() {
            for x in 0..num_x {
                top_down.push(pins[y * num_x + x].universe);
            }
        }
        table
            .lattice_mut(lattice)
            .unwrap()
            .set_grid_cells(num_x, num_y, &top_down)
            .unwrap();
        table.bind_lattices().unwrap();

        let hx = num_x as f64 * pitch / 2.0;
        let hy = num_y as f64 * pitch / 2.0;
        let fill = square_fill(table.ids_mut(), lattice, hx, hy);
        table.add_cell(root, fill).unwrap();

        Self {
            table,
            num_x,
            num_y,
            pitch,
            radius,
            pins,
        }
    }

    /// The pin filling lattice cell `(x, y)`.
    pub fn pin(&self, x: usize, y: usize) -> PinCells {
        self.pins[y * self.num_x + x]
    }

    /// Global coordinates of the center of lattice cell `(x, y)`.
    pub fn cell_center(&self, x: usize, y: usize) -> Point {
        Point::new(
            (x as f64 + 0.5) * self.pitch - self.num_x as f64 * self.pitch / 2.0,
            (y as f64 + 0.5) * self.pitch - self.num_y as f64 * self.pitch / 2.0,
        )
    }
}

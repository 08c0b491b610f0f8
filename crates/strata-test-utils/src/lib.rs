//! Geometry fixtures for strata development.
//!
//! Small builders for the shapes tests keep reaching for: square cells,
//! two-cell pin universes and a root universe holding a lattice of pins.
//! Everything here panics on construction errors; it is test code.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Arc;

use strata_cell::{FillCell, Halfspace, MaterialCell, Surface};
use strata_core::{CellId, IdAllocator, MaterialId, UniverseId};
use strata_universe::UniverseTable;

pub use fixtures::TwoLevelGeometry;

/// Fuel material used by the fixtures.
pub const FUEL: MaterialId = MaterialId(1);
/// Moderator material used by the fixtures.
pub const MODERATOR: MaterialId = MaterialId(2);

/// The four half-spaces of the square `[cx - hx, cx + hx] x [cy - hy, cy + hy]`.
pub fn square_bounds(
    ids: &mut IdAllocator,
    cx: f64,
    cy: f64,
    hx: f64,
    hy: f64,
) -> [(Arc<Surface>, Halfspace); 4] {
    let x_lo = Surface::x_plane(ids.surface_id(), cx - hx).unwrap();
    let x_hi = Surface::x_plane(ids.surface_id(), cx + hx).unwrap();
    let y_lo = Surface::y_plane(ids.surface_id(), cy - hy).unwrap();
    let y_hi = Surface::y_plane(ids.surface_id(), cy + hy).unwrap();
    [
        (Arc::new(x_lo), Halfspace::Positive),
        (Arc::new(x_hi), Halfspace::Negative),
        (Arc::new(y_lo), Halfspace::Positive),
        (Arc::new(y_hi), Halfspace::Negative),
    ]
}

/// A material cell covering the square of half width `half` about the origin.
pub fn square_cell(ids: &mut IdAllocator, material: MaterialId, half: f64) -> MaterialCell {
    let mut cell = MaterialCell::new(ids.cell_id(), material);
    for (surface, halfspace) in square_bounds(ids, 0.0, 0.0, half, half) {
        cell.add_bound(surface, halfspace);
    }
    cell
}

/// A fill cell covering `[-hx, hx] x [-hy, hy]`.
pub fn square_fill(ids: &mut IdAllocator, fill: UniverseId, hx: f64, hy: f64) -> FillCell {
    let mut cell = FillCell::new(ids.cell_id(), fill);
    for (surface, halfspace) in square_bounds(ids, 0.0, 0.0, hx, hy) {
        cell.add_bound(surface, halfspace);
    }
    cell
}

/// Cell ids of a pin universe built by [`pin_cell_universe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinCells {
    pub universe: UniverseId,
    pub fuel: CellId,
    pub moderator: CellId,
}

/// Register a pin universe: `fuel` inside a circle of `radius` about the
/// origin, `moderator` everywhere outside it.
pub fn pin_cell_universe(
    table: &mut UniverseTable,
    id: Option<UniverseId>,
    radius: f64,
    fuel: MaterialId,
    moderator: MaterialId,
) -> PinCells {
    let universe = table.create_universe(id).unwrap();
    let ids = table.ids_mut();
    let circle = Arc::new(Surface::circle(ids.surface_id(), 0.0, 0.0, radius).unwrap());
    let fuel_cell =
        MaterialCell::new(ids.cell_id(), fuel).bounded_by(circle.clone(), Halfspace::Negative);
    let moderator_cell =
        MaterialCell::new(ids.cell_id(), moderator).bounded_by(circle, Halfspace::Positive);
    let cells = PinCells {
        universe,
        fuel: fuel_cell.id(),
        moderator: moderator_cell.id(),
    };
    table.add_cell(universe, fuel_cell).unwrap();
    table.add_cell(universe, moderator_cell).unwrap();
    cells
}

//! Benchmark profiles for the strata geometry kernel.
//!
//! Provides pre-built geometries and query sets:
//!
//! - [`assembly_profile`]: a square fuel assembly, one pin universe shared
//!   by every lattice cell, subdivided into rings and sectors
//! - [`sample_points`]: deterministic query points spread over a square

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use strata_cell::{FillCell, Halfspace, MaterialCell, Surface};
use strata_core::{GeometryError, MaterialId, Point, UniverseId};
use strata_universe::UniverseTable;

/// Pin pitch of the assembly profile, in cm.
pub const PITCH: f64 = 1.26;
/// Fuel radius of the assembly profile, in cm.
pub const FUEL_RADIUS: f64 = 0.4096;

/// Root universe of the assembly profile.
pub const ROOT: UniverseId = UniverseId(0);
/// Assembly lattice of the assembly profile.
pub const ASSEMBLY: UniverseId = UniverseId(1);
/// Pin universe of the assembly profile.
pub const PIN: UniverseId = UniverseId(2);

/// Build an `n x n` assembly: root → lattice → pin.
///
/// The pin has a fuel region split into 3 rings and 8 sectors, and a
/// moderator region split into 8 sectors, so a pin scan visits 32 cells.
pub fn assembly_profile(n: usize) -> Result<UniverseTable, GeometryError> {
    let mut table = UniverseTable::default();
    let root = table.create_universe(Some(ROOT))?;
    let pin = table.create_universe(Some(PIN))?;
    let lattice = table.create_lattice(Some(ASSEMBLY), PITCH, PITCH)?;

    let ids = table.ids_mut();
    let fuel_surface = Arc::new(Surface::circle(ids.surface_id(), 0.0, 0.0, FUEL_RADIUS)?);
    let fuel = MaterialCell::new(ids.cell_id(), MaterialId(1))
        .bounded_by(fuel_surface.clone(), Halfspace::Negative)
        .with_rings(3)
        .with_sectors(8);
    let moderator = MaterialCell::new(ids.cell_id(), MaterialId(2))
        .bounded_by(fuel_surface, Halfspace::Positive)
        .with_sectors(8);
    table.add_cell(pin, fuel)?;
    table.add_cell(pin, moderator)?;

    table
        .lattice_mut(lattice)?
        .set_grid_cells(n, n, &vec![pin; n * n])?;
    table.bind_lattices()?;

    let half = n as f64 * PITCH / 2.0;
    let ids = table.ids_mut();
    let mut fill = FillCell::new(ids.cell_id(), lattice);
    fill.add_bound(Arc::new(Surface::x_plane(ids.surface_id(), -half)?), Halfspace::Positive);
    fill.add_bound(Arc::new(Surface::x_plane(ids.surface_id(), half)?), Halfspace::Negative);
    fill.add_bound(Arc::new(Surface::y_plane(ids.surface_id(), -half)?), Halfspace::Positive);
    fill.add_bound(Arc::new(Surface::y_plane(ids.surface_id(), half)?), Halfspace::Negative);
    table.add_cell(root, fill)?;

    table.subdivide_cells()?;
    Ok(table)
}

/// `count` deterministic points in `[-half, half]^2`.
pub fn sample_points(count: usize, half: f64) -> Vec<Point> {
    (0..count as u64)
        .map(|i| {
            let a = (i.wrapping_mul(6364136223846793007) >> 11) as f64 / (1u64 << 53) as f64;
            let b = (i.wrapping_mul(1442695040888963407) >> 11) as f64 / (1u64 << 53) as f64;
            Point::new((2.0 * a - 1.0) * half, (2.0 * b - 1.0) * half)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_universe::Cursor;

    #[test]
    fn assembly_profile_locates_every_sample() {
        let table = assembly_profile(17).unwrap();
        assert_eq!(table.simple(PIN).unwrap().num_cells(), 32);
        let half = 17.0 * PITCH / 2.0;
        let mut cursor = Cursor::new(Point::ORIGIN, ROOT);
        for p in sample_points(200, half * 0.999) {
            cursor.reset(p, ROOT);
            assert!(table.find_cell(&mut cursor).unwrap().is_some(), "{p}");
            assert_eq!(cursor.len(), 3);
        }
    }

    #[test]
    fn sample_points_stay_in_range() {
        for p in sample_points(1000, 2.0) {
            assert!(p.x.abs() <= 2.0 && p.y.abs() <= 2.0);
        }
    }
}

//! Integration test: lattice indexing and boundary classification as a ray
//! tracker uses them.

use proptest::prelude::*;
use strata_core::{Direction, IdAllocator, Point, UniverseId};
use strata_test_utils::fixtures::{LATTICE, ROOT};
use strata_test_utils::TwoLevelGeometry;
use strata_universe::{CellSide, Cursor, Lattice, LatticeSurface};

fn lattice(nx: usize, ny: usize, width: f64, offset: Point) -> Lattice {
    let mut l = Lattice::new(UniverseId(1), IdAllocator::default().uid(), width, width).unwrap();
    l.set_grid_cells(nx, ny, &vec![UniverseId(2); nx * ny]).unwrap();
    l.set_offset(offset);
    l
}

// ── Boundary classification ─────────────────────────────────────

#[test]
fn shared_edge_depends_on_the_cell_asked() {
    let l = lattice(2, 2, 1.0, Point::ORIGIN);
    let midpoint = Point::new(0.0, -0.5);
    let from_0 = l.grid_surface(0, midpoint).unwrap();
    let from_1 = l.grid_surface(1, midpoint).unwrap();
    // Right edge of cell 0, left edge of cell 1.
    assert_eq!(from_0.index(), 2);
    assert_eq!(from_1.index(), 8);
}

#[test]
fn lattice_corner_is_a_corner() {
    let l = lattice(2, 2, 1.0, Point::ORIGIN);
    for (cell, corner) in [
        (0, Point::new(-1.0, -1.0)),
        (1, Point::new(1.0, -1.0)),
        (3, Point::new(1.0, 1.0)),
        (2, Point::new(-1.0, 1.0)),
    ] {
        let s = l.grid_surface(cell, corner).unwrap();
        assert!(s.side.is_corner(), "cell {cell} gave {:?}", s.side);
        assert!((cell * 8 + 4..=cell * 8 + 7).contains(&s.index()));
    }
}

#[test]
fn shared_interior_corner() {
    let l = lattice(2, 2, 1.0, Point::ORIGIN);
    let center = Point::ORIGIN;
    assert_eq!(l.grid_surface(0, center).unwrap().side, CellSide::TopRight);
    assert_eq!(l.grid_surface(1, center).unwrap().side, CellSide::TopLeft);
    assert_eq!(l.grid_surface(2, center).unwrap().side, CellSide::BottomRight);
    assert_eq!(l.grid_surface(3, center).unwrap().side, CellSide::BottomLeft);
}

#[test]
fn classification_honours_offset() {
    let l = lattice(2, 2, 1.0, Point::new(3.0, 3.0));
    assert_eq!(l.grid_surface(0, Point::new(3.0, 2.5)).unwrap().side, CellSide::Right);
    assert_eq!(l.grid_surface(0, Point::new(0.0, -0.5)), None);
}

// ── Walking a ray across cells ──────────────────────────────────

/// Step along the ray from cell to cell, returning the visited cells.
fn walk(l: &Lattice, mut p: Point, dir: Direction) -> Vec<usize> {
    let mut cell = l.lattice_cell(p).unwrap();
    let mut visited = vec![cell];
    for _ in 0..16 {
        let d = l.min_surface_distance(p, dir).unwrap();
        p = p.advance(d, dir);
        let surface = l.grid_surface(cell, p).expect("ray stopped on a cell boundary");
        match l.neighbour_cell(surface) {
            Some(next) => {
                cell = next;
                visited.push(cell);
            }
            None => break,
        }
    }
    visited
}

#[test]
fn east_walk_crosses_every_column() {
    let l = lattice(3, 3, 1.0, Point::ORIGIN);
    let cells = walk(&l, Point::new(-1.0, -1.2), Direction::from_angle(0.0));
    assert_eq!(cells, vec![0, 1, 2]);
}

#[test]
fn north_walk_crosses_every_row() {
    let l = lattice(3, 3, 1.0, Point::ORIGIN);
    let north = Direction::from_components(0.0, 1.0).unwrap();
    let cells = walk(&l, Point::new(0.2, -1.0), north);
    assert_eq!(cells, vec![1, 4, 7]);
}

#[test]
fn diagonal_walk_through_a_corner() {
    let l = lattice(2, 2, 1.0, Point::ORIGIN);
    let cells = walk(
        &l,
        Point::new(-0.5, -0.5),
        Direction::from_angle(std::f64::consts::FRAC_PI_4),
    );
    assert_eq!(cells, vec![0, 3]);
}

#[test]
fn neighbour_surface_matches_relocation() {
    let l = lattice(4, 4, 1.0, Point::ORIGIN);
    let s = LatticeSurface {
        cell: l.lattice_cell(Point::new(-0.5, 0.5)).unwrap(),
        side: CellSide::Top,
    };
    assert_eq!(l.neighbour_cell(s), Some(l.lattice_cell(Point::new(-0.5, 1.5)).unwrap()));
}

// ── Properties ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn within_bounds_iff_grid_indices(
        x in -4.0f64..4.0,
        y in -4.0f64..4.0,
        nx in 0usize..5,
        ny in 0usize..5,
        width in 0.2f64..2.0,
        ox in -1.0f64..1.0,
        oy in -1.0f64..1.0,
    ) {
        let l = lattice(nx, ny, width, Point::new(ox, oy));
        let p = Point::new(x, y);
        let indexed = l.grid_x(p).is_ok() && l.grid_y(p).is_ok();
        prop_assert_eq!(l.within_bounds(p), indexed);
    }

    #[test]
    fn lattice_edges_are_inside(nx in 1usize..5, ny in 1usize..5, width in 0.2f64..2.0) {
        let l = lattice(nx, ny, width, Point::ORIGIN);
        let hx = nx as f64 * width / 2.0;
        let hy = ny as f64 * width / 2.0;
        for corner in [
            Point::new(-hx, -hy),
            Point::new(hx, -hy),
            Point::new(hx, hy),
            Point::new(-hx, hy),
        ] {
            prop_assert!(l.within_bounds(corner));
            prop_assert!(l.grid_x(corner).unwrap() < nx);
            prop_assert!(l.grid_y(corner).unwrap() < ny);
        }
    }

    #[test]
    fn every_interior_point_reaches_its_grid_pin(fx in 0.01f64..0.99, fy in 0.01f64..0.99) {
        let geo = TwoLevelGeometry::build(3, 2, 1.26, 0.4);
        let p = Point::new((fx - 0.5) * 3.0 * 1.26, (fy - 0.5) * 2.0 * 1.26);
        let l = geo.table.lattice(LATTICE).unwrap();
        let (x, y) = (l.grid_x(p).unwrap(), l.grid_y(p).unwrap());

        let mut cursor = Cursor::new(p, ROOT);
        let cell = geo.table.find_cell(&mut cursor).unwrap().unwrap();
        prop_assert_eq!(cursor.len(), 3);
        prop_assert_eq!(cursor.level(1).unwrap().grid_indices(), Some((x, y)));
        prop_assert_eq!(cell.universe(), Some(geo.pin(x, y).universe));
    }
}

//! Strata: nested CSG universes and lattices for deterministic
//! particle-transport geometry.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use strata::prelude::*;
//!
//! let mut table = UniverseTable::default();
//! let root = table.create_universe(Some(UniverseId(0))).unwrap();
//! let pin = table.create_universe(Some(UniverseId(2))).unwrap();
//! let lattice = table.create_lattice(Some(UniverseId(1)), 1.26, 1.26).unwrap();
//!
//! // A fuel pin: fuel inside r = 0.4, water outside.
//! let ring = Arc::new(Surface::circle(SurfaceId(1), 0.0, 0.0, 0.4).unwrap());
//! table
//!     .add_cell(pin, MaterialCell::new(CellId(1), MaterialId(1)).bounded_by(ring.clone(), Halfspace::Negative))
//!     .unwrap();
//! table
//!     .add_cell(pin, MaterialCell::new(CellId(2), MaterialId(2)).bounded_by(ring, Halfspace::Positive))
//!     .unwrap();
//!
//! // A 2x2 lattice of pins, filling the whole root universe.
//! table.lattice_mut(lattice).unwrap().set_grid_cells(2, 2, &[pin; 4]).unwrap();
//! table.bind_lattices().unwrap();
//! table.add_cell(root, FillCell::new(CellId(3), lattice)).unwrap();
//!
//! let mut cursor = Cursor::new(Point::new(0.7, 0.6), root);
//! let cell = table.find_cell(&mut cursor).unwrap().unwrap();
//! assert_eq!(cell.material(), Some(MaterialId(1)));
//! assert_eq!(cursor.len(), 3);
//! assert_eq!(cursor.level(1).unwrap().grid_indices(), Some((1, 1)));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Ids, points, directions, errors, configuration |
//! | [`cell`] | `strata-cell` | Surfaces, half-spaces, cells, subdivision |
//! | [`universe`] | `strata-universe` | Cursors, universes, lattices, the universe table |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and ids (`strata-core`).
///
/// Contains the id newtypes, [`types::IdAllocator`], [`types::Point`],
/// [`types::GeometryError`] and [`types::GeometryConfig`].
pub use strata_core as types;

/// Cells and bounding surfaces (`strata-cell`).
pub use strata_cell as cell;

/// Universes, lattices and point location (`strata-universe`).
///
/// [`universe::UniverseTable`] is the entry point for building a geometry
/// and running queries.
pub use strata_universe as universe;

/// Common imports for typical strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Ids and geometry primitives
    pub use strata_core::{
        CellId, Direction, IdAllocator, MaterialId, Point, SurfaceId, UniverseId,
    };

    // Errors and configuration
    pub use strata_core::{ConfigError, GeometryConfig, GeometryError};

    // Cells
    pub use strata_cell::{Cell, FillCell, Halfspace, MaterialCell, Surface};

    // Universes
    pub use strata_universe::{
        Cursor, Lattice, LatticeSurface, SimpleUniverse, Universe, UniverseTable,
    };
}

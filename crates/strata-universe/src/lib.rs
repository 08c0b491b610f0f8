//! Nested universes and lattices for strata geometries.
//!
//! A geometry is a tree of universes held in a [`UniverseTable`]. A
//! [`SimpleUniverse`] is a list of [`Cell`](strata_cell::Cell)s; a fill
//! cell hands the point on to another universe at the same coordinates. A
//! [`Lattice`] is a regular grid whose cells are each filled by a universe,
//! entered in the cell's local frame.
//!
//! Point location walks the tree through [`Universe::find_cell`], writing
//! one [`Cursor`] level per universe visited:
//!
//! ```text
//! level 0   root universe      global point      cell = fill(lattice)
//! level 1   lattice            same point        grid (x, y)
//! level 2   pin universe       point - center    cell = fuel
//! ```
//!
//! # Lifecycle
//!
//! 1. Create universes and lattices in the table and add cells.
//! 2. Declare lattice grids, then bind them ([`UniverseTable::bind_lattices`]).
//! 3. Optionally subdivide cells and compute fissionability.
//! 4. Query from any number of threads, each with its own cursor.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cursor;
pub mod grid;
pub mod lattice;
pub mod simple;
pub mod table;
pub mod universe;

pub use cursor::{Cursor, Level, LevelKind};
pub use grid::{CellSide, GridCell, LatticeGrid, LatticeSurface};
pub use lattice::Lattice;
pub use simple::SimpleUniverse;
pub use table::{UniverseSlot, UniverseTable};
pub use universe::Universe;

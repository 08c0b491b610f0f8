//! The closed universe variant and the single recursion dispatch point.

use crate::cursor::Cursor;
use crate::lattice::Lattice;
use crate::simple::SimpleUniverse;
use crate::table::UniverseTable;
use std::fmt;
use strata_cell::Cell;
use strata_core::{
    CellId, Direction, GeometryError, IdAllocator, MaterialId, Point, UniverseId, UniverseKind,
    UniverseUid,
};

/// A universe: either a cell collection or a lattice.
#[derive(Clone, Debug)]
pub enum Universe {
    /// Cells located by scan.
    Simple(SimpleUniverse),
    /// Regular grid of sub-universes.
    Lattice(Lattice),
}

impl Universe {
    /// User-facing id.
    pub fn id(&self) -> UniverseId {
        match self {
            Self::Simple(u) => u.id(),
            Self::Lattice(l) => l.id(),
        }
    }

    /// Internal sequence number.
    pub fn uid(&self) -> UniverseUid {
        match self {
            Self::Simple(u) => u.uid(),
            Self::Lattice(l) => l.uid(),
        }
    }

    /// Variant tag.
    pub fn kind(&self) -> UniverseKind {
        match self {
            Self::Simple(_) => UniverseKind::Simple,
            Self::Lattice(_) => UniverseKind::Lattice,
        }
    }

    /// Fissionability as computed by the analysis pass, `None` before it ran.
    pub fn fissionability(&self) -> Option<bool> {
        match self {
            Self::Simple(u) => u.fissionability(),
            Self::Lattice(l) => l.fissionability(),
        }
    }

    /// Whether the universe (or anything nested in it) holds fissile
    /// material. `false` until the analysis pass has run.
    pub fn is_fissionable(&self) -> bool {
        self.fissionability().unwrap_or(false)
    }

    /// Record the result of the fissionability analysis.
    pub fn set_fissionable(&mut self, fissionable: bool) {
        match self {
            Self::Simple(u) => u.set_fissionable(fissionable),
            Self::Lattice(l) => l.set_fissionable(fissionable),
        }
    }

    /// Universes referenced directly by this one: fill cells of a simple
    /// universe, declared grid ids of a lattice.
    pub fn nested_universe_ids(&self) -> Vec<UniverseId> {
        match self {
            Self::Simple(u) => u.nested_universe_ids(),
            Self::Lattice(l) => l.nested_universe_ids(),
        }
    }

    /// Ids of the directly contained cells, in scan order. Always empty for
    /// a lattice, whose grid cells are addressed by index.
    pub fn cell_ids(&self) -> Vec<CellId> {
        match self {
            Self::Simple(u) => u.cell_ids(),
            Self::Lattice(_) => Vec::new(),
        }
    }

    /// Materials of the directly contained material cells. Always empty
    /// for a lattice.
    pub fn material_ids(&self) -> Vec<MaterialId> {
        match self {
            Self::Simple(u) => u.material_ids(),
            Self::Lattice(_) => Vec::new(),
        }
    }

    /// Number of directly contained cells: cells of a simple universe,
    /// grid cells of a lattice.
    pub fn num_cells(&self) -> usize {
        match self {
            Self::Simple(u) => u.num_cells(),
            Self::Lattice(l) => l.grid().len(),
        }
    }

    /// Find the material cell containing the cursor's global point.
    ///
    /// The search starts in this universe at level 0 of `cursor`, and the
    /// cursor is left holding one level per universe visited. Returns
    /// `Ok(None)` when the point lies in no cell, including when it falls
    /// outside a lattice somewhere on the way down.
    ///
    /// # Errors
    ///
    /// Configuration faults met during the descent: a fill universe that is
    /// not in `table`, or a lattice cell that was never bound.
    pub fn find_cell<'a>(
        &'a self,
        cursor: &mut Cursor,
        table: &'a UniverseTable,
    ) -> Result<Option<&'a Cell>, GeometryError> {
        cursor.enter(self.id());
        self.locate(cursor, 0, table)
    }

    pub(crate) fn locate<'a>(
        &'a self,
        cursor: &mut Cursor,
        depth: usize,
        table: &'a UniverseTable,
    ) -> Result<Option<&'a Cell>, GeometryError> {
        match self {
            Self::Simple(u) => u.locate(cursor, depth, table),
            Self::Lattice(l) => l.locate(cursor, depth, table),
        }
    }

    /// Nearest-surface distance from `point` along `direction`.
    ///
    /// Only a lattice can fail, when `point` is outside it.
    pub fn min_surface_distance(
        &self,
        point: Point,
        direction: Direction,
    ) -> Result<f64, GeometryError> {
        match self {
            Self::Simple(u) => Ok(u.min_surface_distance(point, direction)),
            Self::Lattice(l) => l.min_surface_distance(point, direction),
        }
    }

    /// Clone a flat simple universe under `id` with fresh cell ids.
    /// Lattices cannot be cloned.
    pub fn clone_flat(
        &self,
        id: UniverseId,
        ids: &mut IdAllocator,
    ) -> Result<Universe, GeometryError> {
        match self {
            Self::Simple(u) => u.clone_flat(id, ids).map(Self::Simple),
            Self::Lattice(l) => Err(GeometryError::UnsupportedOperation {
                reason: format!("cannot clone lattice {}", l.id()),
            }),
        }
    }

    /// The simple universe, if this is one.
    pub fn as_simple(&self) -> Option<&SimpleUniverse> {
        match self {
            Self::Simple(u) => Some(u),
            Self::Lattice(_) => None,
        }
    }

    /// The lattice, if this is one.
    pub fn as_lattice(&self) -> Option<&Lattice> {
        match self {
            Self::Lattice(l) => Some(l),
            Self::Simple(_) => None,
        }
    }

    /// Mutable simple universe, if this is one.
    pub fn as_simple_mut(&mut self) -> Option<&mut SimpleUniverse> {
        match self {
            Self::Simple(u) => Some(u),
            Self::Lattice(_) => None,
        }
    }

    /// Mutable lattice, if this is one.
    pub fn as_lattice_mut(&mut self) -> Option<&mut Lattice> {
        match self {
            Self::Lattice(l) => Some(l),
            Self::Simple(_) => None,
        }
    }
}

impl From<SimpleUniverse> for Universe {
    fn from(u: SimpleUniverse) -> Self {
        Self::Simple(u)
    }
}

impl From<Lattice> for Universe {
    fn from(l: Lattice) -> Self {
        Self::Lattice(l)
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(u) => u.fmt(f),
            Self::Lattice(l) => l.fmt(f),
        }
    }
}

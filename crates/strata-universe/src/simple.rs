//! Simple universes: a keyed collection of cells located by linear scan.

use crate::cursor::{Cursor, LevelKind};
use crate::table::UniverseTable;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fmt;
use strata_cell::Cell;
use strata_core::{
    CellId, CellKind, Direction, GeometryError, IdAllocator, MaterialId, Point, UniverseId,
    UniverseUid,
};

/// A universe made of explicitly bounded cells.
///
/// Cells are kept in insertion order, which is also the scan order of
/// [`find_cell`](crate::Universe::find_cell): deterministic, so traces are
/// reproducible. Cells are not expected to overlap; if they do, the first
/// one in scan order wins.
#[derive(Clone, Debug)]
pub struct SimpleUniverse {
    id: UniverseId,
    uid: UniverseUid,
    fissionable: Option<bool>,
    cells: IndexMap<CellId, Cell>,
}

impl SimpleUniverse {
    /// An empty universe.
    pub fn new(id: UniverseId, uid: UniverseUid) -> Self {
        Self {
            id,
            uid,
            fissionable: None,
            cells: IndexMap::new(),
        }
    }

    /// User-facing id.
    pub fn id(&self) -> UniverseId {
        self.id
    }

    /// Internal sequence number.
    pub fn uid(&self) -> UniverseUid {
        self.uid
    }

    /// Fissionability as computed by the analysis pass, `None` before it ran.
    pub fn fissionability(&self) -> Option<bool> {
        self.fissionable
    }

    /// Record the result of the fissionability analysis.
    pub fn set_fissionable(&mut self, fissionable: bool) {
        self.fissionable = Some(fissionable);
    }

    /// Add a cell and make this universe its parent.
    ///
    /// Returns `Err(GeometryError::DuplicateCell)` if the id is taken; use
    /// [`replace_cell`](Self::replace_cell) to overwrite on purpose.
    pub fn add_cell(&mut self, cell: impl Into<Cell>) -> Result<(), GeometryError> {
        let mut cell = cell.into();
        match self.cells.entry(cell.id()) {
            Entry::Occupied(_) => Err(GeometryError::DuplicateCell {
                universe: self.id,
                cell: cell.id(),
            }),
            Entry::Vacant(slot) => {
                cell.set_universe(self.id);
                tracing::debug!(universe = %self.id, cell = %cell.id(), "added cell");
                slot.insert(cell);
                Ok(())
            }
        }
    }

    /// Insert or overwrite a cell, returning the one it replaced.
    pub fn replace_cell(&mut self, cell: impl Into<Cell>) -> Option<Cell> {
        let mut cell = cell.into();
        cell.set_universe(self.id);
        self.cells.insert(cell.id(), cell)
    }

    /// Cell by id.
    pub fn cell(&self, id: CellId) -> Result<&Cell, GeometryError> {
        self.cells.get(&id).ok_or(GeometryError::CellNotFound {
            universe: self.id,
            cell: id,
        })
    }

    /// Cell by id, expected to be a material cell.
    ///
    /// A fill cell is logged as a type mismatch and still returned; callers
    /// must check the variant.
    pub fn material_cell(&self, id: CellId) -> Result<&Cell, GeometryError> {
        self.typed_cell(id, CellKind::Material)
    }

    /// Cell by id, expected to be a fill cell.
    ///
    /// A material cell is logged as a type mismatch and still returned;
    /// callers must check the variant.
    pub fn fill_cell(&self, id: CellId) -> Result<&Cell, GeometryError> {
        self.typed_cell(id, CellKind::Fill)
    }

    fn typed_cell(&self, id: CellId, expected: CellKind) -> Result<&Cell, GeometryError> {
        let cell = self.cell(id)?;
        if cell.kind() != expected {
            let mismatch = GeometryError::CellTypeMismatch {
                universe: self.id,
                cell: id,
                expected,
            };
            tracing::warn!(%mismatch, "typed cell accessor");
        }
        Ok(cell)
    }

    /// Cells in scan order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    /// Number of cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Ids of all cells, in scan order.
    pub fn cell_ids(&self) -> Vec<CellId> {
        self.cells.keys().copied().collect()
    }

    /// Materials of the material cells directly in this universe.
    ///
    /// Only looks one level deep; nested universes are not visited.
    pub fn material_ids(&self) -> Vec<MaterialId> {
        self.cells.values().filter_map(Cell::material).collect()
    }

    /// Universes filling the fill cells directly in this universe.
    pub fn nested_universe_ids(&self) -> Vec<UniverseId> {
        self.cells.values().filter_map(Cell::fill).collect()
    }

    /// Locate the cell containing the point at cursor level `depth`.
    pub(crate) fn locate<'a>(
        &'a self,
        cursor: &mut Cursor,
        depth: usize,
        table: &'a UniverseTable,
    ) -> Result<Option<&'a Cell>, GeometryError> {
        cursor.mark(depth, LevelKind::Universe);
        let point = cursor.levels()[depth].point();
        let threshold = table.config().on_surface_threshold;

        for cell in self.cells.values() {
            if !cell.contains(point, threshold) {
                continue;
            }
            cursor.set_cell(depth, cell.id());
            match cell {
                Cell::Material(_) => {
                    cursor.prune(depth);
                    return Ok(Some(cell));
                }
                Cell::Fill(fill) => {
                    let next = table.get(fill.fill())?;
                    cursor.descend(depth, point, fill.fill());
                    return next.locate(cursor, depth + 1, table);
                }
            }
        }
        cursor.prune(depth);
        Ok(None)
    }

    /// Smallest nearest-surface distance over all cells.
    ///
    /// A coarse bound: every cell is asked, whether or not it contains the
    /// point. Infinity for an empty universe.
    pub fn min_surface_distance(&self, point: Point, direction: Direction) -> f64 {
        self.cells
            .values()
            .map(|c| c.min_surface_distance(point, direction))
            .fold(f64::INFINITY, f64::min)
    }

    /// Expand every material cell with pending rings or sectors into its
    /// subcells. Returns the number of cells that were expanded.
    ///
    /// The scan restarts after each expansion, so this is quadratic in the
    /// number of pending cells; it only runs once, at geometry build time.
    pub fn subdivide(&mut self, ids: &mut IdAllocator) -> Result<usize, GeometryError> {
        let mut expanded = 0;
        loop {
            let pending = self
                .cells
                .values()
                .enumerate()
                .find_map(|(index, cell)| match cell {
                    Cell::Material(m) if m.has_pending_subdivision() => {
                        Some((index, m.subdivide(ids)))
                    }
                    _ => None,
                });
            let Some((index, subcells)) = pending else {
                break;
            };
            let subcells = subcells?;
            // All subcell ids are checked before the original cell is removed.
            let original = self.cells.get_index(index).map(|(id, _)| *id);
            if let Some(taken) = subcells
                .iter()
                .map(|sub| sub.id())
                .find(|id| Some(*id) != original && self.cells.contains_key(id))
            {
                return Err(GeometryError::DuplicateCell {
                    universe: self.id,
                    cell: taken,
                });
            }
            self.cells.shift_remove_index(index);
            for sub in subcells {
                self.add_cell(sub)?;
            }
            expanded += 1;
        }
        if expanded > 0 {
            tracing::debug!(universe = %self.id, expanded, cells = self.cells.len(), "subdivided cells");
        }
        Ok(expanded)
    }

    /// Copy this universe under `id`, deep-cloning every cell under a fresh
    /// auto cell id that this universe does not already use.
    ///
    /// Only flat universes can be cloned: a fill cell would need a policy
    /// for sharing or copying the nested universe, so it is rejected with
    /// `Err(GeometryError::UnsupportedOperation)`.
    pub fn clone_flat(
        &self,
        id: UniverseId,
        ids: &mut IdAllocator,
    ) -> Result<SimpleUniverse, GeometryError> {
        if let Some(fill) = self.cells.values().find_map(Cell::as_fill) {
            return Err(GeometryError::UnsupportedOperation {
                reason: format!(
                    "cannot clone universe {} since cell {} is filled with universe {}",
                    self.id,
                    fill.id(),
                    fill.fill()
                ),
            });
        }
        let mut clone = SimpleUniverse::new(id, ids.uid());
        tracing::debug!(universe = %self.id, clone = %clone.id, "cloning universe");
        for cell in self.cells.values().filter_map(Cell::as_material) {
            let cell_id = loop {
                let next = ids.cell_id();
                if !self.cells.contains_key(&next) {
                    break next;
                }
            };
            clone.add_cell(cell.clone_with_id(cell_id))?;
        }
        Ok(clone)
    }
}

impl fmt::Display for SimpleUniverse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Universe ID = {}, type = SIMPLE, num cells = {}, cell IDs = ",
            self.id,
            self.cells.len()
        )?;
        for id in self.cells.keys() {
            write!(f, "{id}, ")?;
        }
        Ok(())
    }
}

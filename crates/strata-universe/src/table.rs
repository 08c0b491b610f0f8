//! The universe registry and geometry-build context.
//!
//! [`UniverseTable`] owns every universe of a geometry, the id allocator
//! that hands out auto ids and uids, and the validated configuration.
//! Construction goes through `&mut self`; once the geometry is built the
//! table is only read, and can be shared across query threads.

use crate::cursor::Cursor;
use crate::lattice::Lattice;
use crate::simple::SimpleUniverse;
use crate::universe::Universe;
use indexmap::{IndexMap, IndexSet};
use strata_cell::Cell;
use strata_core::{
    ConfigError, Direction, GeometryConfig, GeometryError, IdAllocator, MaterialId, Point,
    UniverseId, UniverseKind,
};

/// Dense index of a universe inside a [`UniverseTable`].
///
/// Lattice cells store a slot once bound. Universes are never removed from
/// a table, so a slot stays valid for the table's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniverseSlot(pub(crate) usize);

impl UniverseSlot {
    /// Position in the table, in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Registry of all universes in a geometry.
///
/// # Examples
///
/// ```
/// use strata_core::UniverseId;
/// use strata_universe::UniverseTable;
///
/// let mut table = UniverseTable::default();
/// let root = table.create_universe(Some(UniverseId(0))).unwrap();
/// let auto = table.create_universe(None).unwrap();
/// assert_eq!(root, UniverseId(0));
/// assert_eq!(auto, UniverseId(10_000));
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug)]
pub struct UniverseTable {
    universes: IndexMap<UniverseId, Universe>,
    ids: IdAllocator,
    config: GeometryConfig,
}

impl UniverseTable {
    /// An empty table using `config`.
    pub fn new(config: GeometryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            universes: IndexMap::new(),
            ids: IdAllocator::new(config.auto_id_offset),
            config,
        })
    }

    /// The configuration the table was built with.
    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// On-surface threshold handed to lattices and containment tests.
    pub fn threshold(&self) -> f64 {
        self.config.on_surface_threshold
    }

    /// The id allocator, for building cells and surfaces with auto ids.
    pub fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    /// Number of registered universes.
    pub fn len(&self) -> usize {
        self.universes.len()
    }

    /// Whether no universe is registered.
    pub fn is_empty(&self) -> bool {
        self.universes.is_empty()
    }

    /// Universes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Universe> + '_ {
        self.universes.values()
    }

    fn claim_id(&mut self, id: Option<UniverseId>) -> Result<UniverseId, GeometryError> {
        match id {
            Some(id) if self.ids.is_reserved(id.0) => Err(GeometryError::ReservedId {
                id: id.0,
                offset: self.ids.offset(),
            }),
            Some(id) if self.universes.contains_key(&id) => {
                Err(GeometryError::DuplicateUniverse { universe: id })
            }
            Some(id) => Ok(id),
            None => loop {
                let id = self.ids.universe_id();
                if !self.universes.contains_key(&id) {
                    break Ok(id);
                }
            },
        }
    }

    /// Create and register an empty simple universe.
    ///
    /// With `None` an auto id is assigned. A user id must be below the
    /// auto-id offset and not already registered.
    pub fn create_universe(&mut self, id: Option<UniverseId>) -> Result<UniverseId, GeometryError> {
        let id = self.claim_id(id)?;
        let uid = self.ids.uid();
        self.universes.insert(id, SimpleUniverse::new(id, uid).into());
        tracing::debug!(universe = %id, %uid, "created universe");
        Ok(id)
    }

    /// Create and register an empty lattice with the given cell widths.
    ///
    /// Id rules are the same as for
    /// [`create_universe`](Self::create_universe).
    pub fn create_lattice(
        &mut self,
        id: Option<UniverseId>,
        width_x: f64,
        width_y: f64,
    ) -> Result<UniverseId, GeometryError> {
        let id = self.claim_id(id)?;
        let lattice = Lattice::new(id, self.ids.uid(), width_x, width_y)?
            .with_threshold(self.config.on_surface_threshold);
        tracing::debug!(lattice = %id, width_x, width_y, "created lattice");
        self.universes.insert(id, lattice.into());
        Ok(id)
    }

    /// Register a universe built elsewhere.
    ///
    /// Only duplicates are rejected: ids from [`ids_mut`](Self::ids_mut)
    /// lie in the reserved range and are accepted here.
    pub fn insert(&mut self, universe: impl Into<Universe>) -> Result<UniverseSlot, GeometryError> {
        let universe = universe.into();
        let id = universe.id();
        if self.universes.contains_key(&id) {
            return Err(GeometryError::DuplicateUniverse { universe: id });
        }
        let (index, _) = self.universes.insert_full(id, universe);
        Ok(UniverseSlot(index))
    }

    /// Universe by id.
    pub fn get(&self, id: UniverseId) -> Result<&Universe, GeometryError> {
        self.universes
            .get(&id)
            .ok_or(GeometryError::UniverseNotFound { universe: id })
    }

    /// Mutable universe by id.
    pub fn get_mut(&mut self, id: UniverseId) -> Result<&mut Universe, GeometryError> {
        self.universes
            .get_mut(&id)
            .ok_or(GeometryError::UniverseNotFound { universe: id })
    }

    /// Slot of a registered universe.
    pub fn slot_of(&self, id: UniverseId) -> Result<UniverseSlot, GeometryError> {
        self.universes
            .get_index_of(&id)
            .map(UniverseSlot)
            .ok_or(GeometryError::UniverseNotFound { universe: id })
    }

    /// Universe in `slot`.
    pub fn universe_at(&self, slot: UniverseSlot) -> Option<&Universe> {
        self.universes.get_index(slot.0).map(|(_, u)| u)
    }

    /// Simple universe by id; a lattice is a `UniverseTypeMismatch`.
    pub fn simple(&self, id: UniverseId) -> Result<&SimpleUniverse, GeometryError> {
        self.get(id)?
            .as_simple()
            .ok_or(GeometryError::UniverseTypeMismatch {
                universe: id,
                expected: UniverseKind::Simple,
            })
    }

    /// Mutable simple universe by id.
    pub fn simple_mut(&mut self, id: UniverseId) -> Result<&mut SimpleUniverse, GeometryError> {
        self.get_mut(id)?
            .as_simple_mut()
            .ok_or(GeometryError::UniverseTypeMismatch {
                universe: id,
                expected: UniverseKind::Simple,
            })
    }

    /// Lattice by id; a simple universe is a `UniverseTypeMismatch`.
    pub fn lattice(&self, id: UniverseId) -> Result<&Lattice, GeometryError> {
        self.get(id)?
            .as_lattice()
            .ok_or(GeometryError::UniverseTypeMismatch {
                universe: id,
                expected: UniverseKind::Lattice,
            })
    }

    /// Mutable lattice by id.
    pub fn lattice_mut(&mut self, id: UniverseId) -> Result<&mut Lattice, GeometryError> {
        self.get_mut(id)?
            .as_lattice_mut()
            .ok_or(GeometryError::UniverseTypeMismatch {
                universe: id,
                expected: UniverseKind::Lattice,
            })
    }

    /// Add a cell to a simple universe.
    ///
    /// A cell id at or above the auto-id offset is accepted only if this
    /// table's allocator issued it; anything else is a `ReservedId`, since a
    /// later subdivision or clone could be handed the same id.
    pub fn add_cell(
        &mut self,
        universe: UniverseId,
        cell: impl Into<Cell>,
    ) -> Result<(), GeometryError> {
        let cell = cell.into();
        let id = cell.id();
        if self.ids.is_reserved(id.0) && !self.ids.has_issued_cell(id) {
            return Err(GeometryError::ReservedId {
                id: id.0,
                offset: self.ids.offset(),
            });
        }
        self.simple_mut(universe)?.add_cell(cell)
    }

    /// Bind the cells of `lattice` that declare `universe`.
    ///
    /// Returns the number of cells bound.
    pub fn bind_universe(
        &mut self,
        lattice: UniverseId,
        universe: UniverseId,
    ) -> Result<usize, GeometryError> {
        let slot = self.slot_of(universe)?;
        Ok(self.lattice_mut(lattice)?.bind_universe(universe, slot))
    }

    /// Bind every declared cell of every lattice.
    ///
    /// All ids are resolved before anything is bound, so a missing
    /// universe leaves every lattice untouched.
    pub fn bind_lattices(&mut self) -> Result<(), GeometryError> {
        let mut plan = Vec::new();
        for (index, universe) in self.universes.values().enumerate() {
            let Some(lattice) = universe.as_lattice() else {
                continue;
            };
            let declared: IndexSet<UniverseId> =
                lattice.nested_universe_ids().into_iter().collect();
            for id in declared {
                plan.push((index, id, self.slot_of(id)?));
            }
        }
        for (index, id, slot) in plan {
            if let Some(lattice) = self.universes[index].as_lattice_mut() {
                lattice.bind_universe(id, slot);
            }
        }
        Ok(())
    }

    /// Expand pending rings and sectors in every simple universe.
    ///
    /// Returns the number of cells expanded.
    pub fn subdivide_cells(&mut self) -> Result<usize, GeometryError> {
        let mut expanded = 0;
        for universe in self.universes.values_mut() {
            if let Universe::Simple(u) = universe {
                expanded += u.subdivide(&mut self.ids)?;
            }
        }
        Ok(expanded)
    }

    /// Register a flat copy of universe `id` under a fresh auto id.
    pub fn clone_universe(&mut self, id: UniverseId) -> Result<UniverseId, GeometryError> {
        self.get(id)?;
        let clone_id = self.claim_id(None)?;
        let clone = self
            .universes
            .get(&id)
            .ok_or(GeometryError::UniverseNotFound { universe: id })?
            .clone_flat(clone_id, &mut self.ids)?;
        self.insert(clone)?;
        Ok(clone_id)
    }

    /// Every universe reachable from `root`, nested universes before the
    /// universes containing them and `root` last.
    ///
    /// # Errors
    ///
    /// `UniverseNotFound` for a referenced id that is not registered, and
    /// `CyclicNesting` when a universe contains itself at any depth.
    pub fn reachable_universes(&self, root: UniverseId) -> Result<Vec<UniverseId>, GeometryError> {
        let mut on_path = IndexSet::new();
        let mut done = IndexSet::new();
        self.visit(root, &mut on_path, &mut done)?;
        Ok(done.into_iter().collect())
    }

    fn visit(
        &self,
        id: UniverseId,
        on_path: &mut IndexSet<UniverseId>,
        done: &mut IndexSet<UniverseId>,
    ) -> Result<(), GeometryError> {
        if done.contains(&id) {
            return Ok(());
        }
        if !on_path.insert(id) {
            return Err(GeometryError::CyclicNesting { universe: id });
        }
        for nested in self.get(id)?.nested_universe_ids() {
            self.visit(nested, on_path, done)?;
        }
        on_path.pop();
        done.insert(id);
        Ok(())
    }

    /// Flag every universe reachable from `root` as fissionable when it, or
    /// anything nested in it, holds a material for which `is_fissile` is
    /// true.
    pub fn compute_fissionability(
        &mut self,
        root: UniverseId,
        is_fissile: impl Fn(MaterialId) -> bool,
    ) -> Result<(), GeometryError> {
        for id in self.reachable_universes(root)? {
            let universe = self.get(id)?;
            let fissionable = universe.material_ids().into_iter().any(&is_fissile)
                || universe
                    .nested_universe_ids()
                    .iter()
                    .any(|n| self.universes.get(n).is_some_and(Universe::is_fissionable));
            self.get_mut(id)?.set_fissionable(fissionable);
        }
        Ok(())
    }

    /// Find the material cell containing the cursor's global point,
    /// starting from the universe recorded at the cursor's root level.
    pub fn find_cell(&self, cursor: &mut Cursor) -> Result<Option<&Cell>, GeometryError> {
        self.get(cursor.root().universe())?.find_cell(cursor, self)
    }

    /// Nearest-surface distance inside universe `id`.
    pub fn min_surface_distance(
        &self,
        id: UniverseId,
        point: Point,
        direction: Direction,
    ) -> Result<f64, GeometryError> {
        self.get(id)?.min_surface_distance(point, direction)
    }
}

impl Default for UniverseTable {
    fn default() -> Self {
        let config = GeometryConfig::default();
        Self {
            universes: IndexMap::new(),
            ids: IdAllocator::new(config.auto_id_offset),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_cell::{FillCell, MaterialCell};
    use strata_core::CellId;

    #[test]
    fn rejects_invalid_config() {
        let config = GeometryConfig {
            on_surface_threshold: -1.0,
            ..GeometryConfig::default()
        };
        assert!(UniverseTable::new(config).is_err());
    }

    #[test]
    fn auto_ids_follow_configured_offset() {
        let config = GeometryConfig {
            auto_id_offset: 500,
            ..GeometryConfig::default()
        };
        let mut table = UniverseTable::new(config).unwrap();
        assert_eq!(table.create_universe(None).unwrap(), UniverseId(500));
        assert!(matches!(
            table.create_universe(Some(UniverseId(500))),
            Err(GeometryError::ReservedId { id: 500, offset: 500 })
        ));
    }

    #[test]
    fn duplicate_universe_ids_are_rejected() {
        let mut table = UniverseTable::default();
        table.create_universe(Some(UniverseId(3))).unwrap();
        assert_eq!(
            table.create_lattice(Some(UniverseId(3)), 1.0, 1.0),
            Err(GeometryError::DuplicateUniverse {
                universe: UniverseId(3)
            })
        );
        let uid = table.ids_mut().uid();
        assert!(table.insert(SimpleUniverse::new(UniverseId(3), uid)).is_err());
    }

    #[test]
    fn auto_id_skips_inserted_universe() {
        let mut table = UniverseTable::default();
        let uid = table.ids_mut().uid();
        table.insert(SimpleUniverse::new(UniverseId(10_000), uid)).unwrap();
        assert_eq!(table.create_universe(None).unwrap(), UniverseId(10_001));
    }

    #[test]
    fn clone_skips_inserted_universe() {
        let mut table = UniverseTable::default();
        let uid = table.ids_mut().uid();
        table.insert(SimpleUniverse::new(UniverseId(10_000), uid)).unwrap();
        let u = table.create_universe(Some(UniverseId(3))).unwrap();
        let c = table.clone_universe(u).unwrap();
        assert_eq!(c, UniverseId(10_001));
        assert_eq!(table.len(), 3);
        assert!(table.simple(c).is_ok());
    }

    #[test]
    fn unissued_reserved_cell_ids_are_rejected() {
        let mut table = UniverseTable::default();
        let u = table.create_universe(None).unwrap();
        assert_eq!(
            table.add_cell(u, MaterialCell::new(CellId(10_001), MaterialId(1))),
            Err(GeometryError::ReservedId {
                id: 10_001,
                offset: 10_000
            })
        );
        let issued = table.ids_mut().cell_id();
        table.add_cell(u, MaterialCell::new(issued, MaterialId(1))).unwrap();
        table.add_cell(u, MaterialCell::new(CellId(9_999), MaterialId(1))).unwrap();
        assert_eq!(table.simple(u).unwrap().num_cells(), 2);
    }

    #[test]
    fn typed_lookups() {
        let mut table = UniverseTable::default();
        let u = table.create_universe(None).unwrap();
        let l = table.create_lattice(None, 1.0, 1.0).unwrap();
        assert!(table.simple(u).is_ok());
        assert!(table.lattice(l).is_ok());
        assert_eq!(
            table.lattice(u).unwrap_err(),
            GeometryError::UniverseTypeMismatch {
                universe: u,
                expected: UniverseKind::Lattice
            }
        );
        assert!(table.simple_mut(l).is_err());
        assert!(matches!(
            table.get(UniverseId(42)),
            Err(GeometryError::UniverseNotFound { .. })
        ));
    }

    #[test]
    fn lattice_inherits_threshold() {
        let config = GeometryConfig {
            on_surface_threshold: 1e-9,
            ..GeometryConfig::default()
        };
        let mut table = UniverseTable::new(config).unwrap();
        let l = table.create_lattice(None, 1.0, 1.0).unwrap();
        assert_eq!(table.lattice(l).unwrap().threshold(), 1e-9);
    }

    #[test]
    fn bind_lattices_fails_before_binding_anything() {
        let mut table = UniverseTable::default();
        let pin = table.create_universe(Some(UniverseId(1))).unwrap();
        let l = table.create_lattice(Some(UniverseId(2)), 1.0, 1.0).unwrap();
        table
            .lattice_mut(l)
            .unwrap()
            .set_grid_cells(2, 1, &[pin, UniverseId(9)])
            .unwrap();
        assert_eq!(
            table.bind_lattices(),
            Err(GeometryError::UniverseNotFound {
                universe: UniverseId(9)
            })
        );
        assert!(table.lattice(l).unwrap().grid().iter().all(|c| c.bound().is_none()));

        table.create_universe(Some(UniverseId(9))).unwrap();
        table.bind_lattices().unwrap();
        assert!(table.lattice(l).unwrap().grid().is_fully_bound());
    }

    #[test]
    fn bind_universe_reports_count() {
        let mut table = UniverseTable::default();
        let pin = table.create_universe(None).unwrap();
        let other = table.create_universe(None).unwrap();
        let l = table.create_lattice(None, 1.0, 1.0).unwrap();
        table
            .lattice_mut(l)
            .unwrap()
            .set_grid_cells(2, 2, &[pin; 4])
            .unwrap();
        assert_eq!(table.bind_universe(l, pin).unwrap(), 4);
        assert_eq!(table.bind_universe(l, other).unwrap(), 0);
        assert!(table.bind_universe(l, UniverseId(77)).is_err());
    }

    #[test]
    fn reachable_is_post_order() {
        let mut table = UniverseTable::default();
        let leaf = table.create_universe(Some(UniverseId(3))).unwrap();
        let mid = table.create_universe(Some(UniverseId(2))).unwrap();
        let root = table.create_universe(Some(UniverseId(1))).unwrap();
        table.add_cell(mid, FillCell::new(CellId(1), leaf)).unwrap();
        table.add_cell(root, FillCell::new(CellId(2), mid)).unwrap();
        table.add_cell(root, FillCell::new(CellId(3), leaf)).unwrap();
        assert_eq!(table.reachable_universes(root).unwrap(), vec![leaf, mid, root]);
    }

    #[test]
    fn cycles_are_reported() {
        let mut table = UniverseTable::default();
        let a = table.create_universe(Some(UniverseId(1))).unwrap();
        let b = table.create_universe(Some(UniverseId(2))).unwrap();
        table.add_cell(a, FillCell::new(CellId(1), b)).unwrap();
        table.add_cell(b, FillCell::new(CellId(2), a)).unwrap();
        assert!(matches!(
            table.reachable_universes(a),
            Err(GeometryError::CyclicNesting { .. })
        ));
    }

    #[test]
    fn fissionability_propagates_upward() {
        let mut table = UniverseTable::default();
        let fuel = table.create_universe(Some(UniverseId(3))).unwrap();
        let water = table.create_universe(Some(UniverseId(4))).unwrap();
        let root = table.create_universe(Some(UniverseId(1))).unwrap();
        table.add_cell(fuel, MaterialCell::new(CellId(1), MaterialId(1))).unwrap();
        table.add_cell(water, MaterialCell::new(CellId(2), MaterialId(2))).unwrap();
        table.add_cell(root, FillCell::new(CellId(3), fuel)).unwrap();
        table.add_cell(root, FillCell::new(CellId(4), water)).unwrap();

        table
            .compute_fissionability(root, |m| m == MaterialId(1))
            .unwrap();
        assert!(table.get(fuel).unwrap().is_fissionable());
        assert!(!table.get(water).unwrap().is_fissionable());
        assert_eq!(table.get(water).unwrap().fissionability(), Some(false));
        assert!(table.get(root).unwrap().is_fissionable());
    }

    #[test]
    fn clone_universe_registers_copy() {
        let mut table = UniverseTable::default();
        let u = table.create_universe(Some(UniverseId(1))).unwrap();
        table.add_cell(u, MaterialCell::new(CellId(1), MaterialId(5))).unwrap();
        let c = table.clone_universe(u).unwrap();
        assert!(table.ids_mut().is_reserved(c.0));
        assert_eq!(table.simple(c).unwrap().material_ids(), vec![MaterialId(5)]);
        assert_eq!(table.len(), 2);
    }
}

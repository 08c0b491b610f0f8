//! Strongly-typed identifiers and the [`IdAllocator`] that hands out
//! auto-generated ones.

use std::fmt;

/// First id handed out by auto-generation.
///
/// User-supplied universe, cell and surface ids must stay below this
/// offset so that they never collide with generated ones.
pub const AUTO_ID_OFFSET: u32 = 10_000;

/// User-facing identifier of a universe (or lattice).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniverseId(pub u32);

impl fmt::Display for UniverseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UniverseId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a cell within its parent universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies the material filling a material cell.
///
/// Material properties live outside the geometry; cells only carry the id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MaterialId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a bounding surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SurfaceId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Internal sequence number of a universe.
///
/// Unlike [`UniverseId`], which the user picks, the uid is assigned by the
/// [`IdAllocator`] at construction and increases monotonically in creation
/// order. A clone of a universe receives a fresh uid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniverseUid(u64);

impl UniverseUid {
    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UniverseUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generator state for auto ids and universe uids.
///
/// Owned by a geometry-build context rather than living in a static, so
/// two geometries built in the same process (or two tests running in
/// parallel) see identical, reproducible id sequences.
///
/// # Examples
///
/// ```
/// use strata_core::{IdAllocator, UniverseId};
///
/// let mut ids = IdAllocator::default();
/// assert_eq!(ids.universe_id(), UniverseId(10_000));
/// assert_eq!(ids.universe_id(), UniverseId(10_001));
/// assert!(ids.is_reserved(10_000));
/// assert!(!ids.is_reserved(9_999));
/// ```
#[derive(Clone, Debug)]
pub struct IdAllocator {
    offset: u32,
    next_universe: u32,
    next_cell: u32,
    next_surface: u32,
    next_uid: u64,
}

impl IdAllocator {
    /// Create an allocator whose auto ids start at `offset`.
    pub fn new(offset: u32) -> Self {
        Self {
            offset,
            next_universe: offset,
            next_cell: offset,
            next_surface: offset,
            next_uid: 0,
        }
    }

    /// First auto-generated id.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns `true` if `id` falls in the auto-generated range and must not
    /// be chosen by a user.
    pub fn is_reserved(&self, id: u32) -> bool {
        id >= self.offset
    }

    /// Returns `true` if `id` is an auto cell id this allocator has already
    /// handed out. Reserved ids it has not issued yet would collide with a
    /// later allocation.
    pub fn has_issued_cell(&self, id: CellId) -> bool {
        (self.offset..self.next_cell).contains(&id.0)
    }

    /// Next auto-generated universe id.
    pub fn universe_id(&mut self) -> UniverseId {
        let id = self.next_universe;
        self.next_universe += 1;
        UniverseId(id)
    }

    /// Next auto-generated cell id.
    pub fn cell_id(&mut self) -> CellId {
        let id = self.next_cell;
        self.next_cell += 1;
        CellId(id)
    }

    /// Next auto-generated surface id.
    pub fn surface_id(&mut self) -> SurfaceId {
        let id = self.next_surface;
        self.next_surface += 1;
        SurfaceId(id)
    }

    /// Next universe sequence number.
    pub fn uid(&mut self) -> UniverseUid {
        let uid = self.next_uid;
        self.next_uid += 1;
        UniverseUid(uid)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(AUTO_ID_OFFSET)
    }
}

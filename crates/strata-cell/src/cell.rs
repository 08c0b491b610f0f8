//! Cells: regions of the plane bounded by surface half-spaces.

use crate::surface::{Bound, Halfspace, Surface};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use strata_core::{CellId, CellKind, Direction, MaterialId, Point, UniverseId};

/// Bounding half-spaces of one cell. Four covers a square pin cell.
pub type Bounds = SmallVec<[Bound; 4]>;

fn bounds_contain(bounds: &[Bound], point: Point, threshold: f64) -> bool {
    bounds.iter().all(|b| b.admits(point, threshold))
}

fn bounds_min_distance(bounds: &[Bound], point: Point, direction: Direction) -> f64 {
    bounds
        .iter()
        .map(|b| b.surface().distance(point, direction))
        .fold(f64::INFINITY, f64::min)
}

fn write_bounds(f: &mut fmt::Formatter<'_>, bounds: &[Bound]) -> fmt::Result {
    write!(f, ", surfaces = ")?;
    for b in bounds {
        let sign = match b.halfspace() {
            Halfspace::Negative => '-',
            Halfspace::Positive => '+',
        };
        write!(f, "{sign}{}, ", b.surface().id())?;
    }
    Ok(())
}

/// A leaf cell filled with a material.
///
/// May carry pending ring and sector counts, which the owning universe
/// expands into sibling cells during subdivision.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialCell {
    pub(crate) id: CellId,
    pub(crate) universe: Option<UniverseId>,
    pub(crate) material: MaterialId,
    pub(crate) bounds: Bounds,
    pub(crate) rings: u32,
    pub(crate) sectors: u32,
}

impl MaterialCell {
    /// An unbounded cell of `material`; add bounds with
    /// [`bounded_by`](Self::bounded_by).
    pub fn new(id: CellId, material: MaterialId) -> Self {
        Self {
            id,
            universe: None,
            material,
            bounds: Bounds::new(),
            rings: 0,
            sectors: 0,
        }
    }

    /// Add a bounding half-space (builder form).
    pub fn bounded_by(mut self, surface: Arc<Surface>, halfspace: Halfspace) -> Self {
        self.add_bound(surface, halfspace);
        self
    }

    /// Request `rings` equal-area annular subcells (builder form).
    pub fn with_rings(mut self, rings: u32) -> Self {
        self.rings = rings;
        self
    }

    /// Request `sectors` equal-angle wedge subcells (builder form).
    pub fn with_sectors(mut self, sectors: u32) -> Self {
        self.sectors = sectors;
        self
    }

    /// Add a bounding half-space.
    pub fn add_bound(&mut self, surface: Arc<Surface>, halfspace: Halfspace) {
        self.bounds.push(Bound::new(surface, halfspace));
    }

    /// Cell id.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Filling material.
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Pending ring count (`0` = none).
    pub fn rings(&self) -> u32 {
        self.rings
    }

    /// Pending sector count (`0` = none).
    pub fn sectors(&self) -> u32 {
        self.sectors
    }

    /// Whether subdivision would expand this cell.
    pub fn has_pending_subdivision(&self) -> bool {
        self.rings > 0 || self.sectors > 0
    }

    /// Bounding half-spaces.
    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    /// Deep copy under a new id, detached from any universe.
    ///
    /// Surfaces stay shared: they are immutable once built.
    pub fn clone_with_id(&self, id: CellId) -> Self {
        Self {
            id,
            universe: None,
            ..self.clone()
        }
    }
}

/// A cell that is a window into a nested universe.
#[derive(Clone, Debug, PartialEq)]
pub struct FillCell {
    pub(crate) id: CellId,
    pub(crate) universe: Option<UniverseId>,
    pub(crate) fill: UniverseId,
    pub(crate) bounds: Bounds,
}

impl FillCell {
    /// An unbounded cell filled by universe `fill`.
    pub fn new(id: CellId, fill: UniverseId) -> Self {
        Self {
            id,
            universe: None,
            fill,
            bounds: Bounds::new(),
        }
    }

    /// Add a bounding half-space (builder form).
    pub fn bounded_by(mut self, surface: Arc<Surface>, halfspace: Halfspace) -> Self {
        self.add_bound(surface, halfspace);
        self
    }

    /// Add a bounding half-space.
    pub fn add_bound(&mut self, surface: Arc<Surface>, halfspace: Halfspace) {
        self.bounds.push(Bound::new(surface, halfspace));
    }

    /// Cell id.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// The universe that fills this cell.
    pub fn fill(&self) -> UniverseId {
        self.fill
    }

    /// Bounding half-spaces.
    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }
}

/// A region of a universe: either a material leaf or a nested universe.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// Leaf cell filled with a material.
    Material(MaterialCell),
    /// Window into a nested universe.
    Fill(FillCell),
}

impl Cell {
    /// Cell id.
    pub fn id(&self) -> CellId {
        match self {
            Self::Material(c) => c.id,
            Self::Fill(c) => c.id,
        }
    }

    /// Variant tag.
    pub fn kind(&self) -> CellKind {
        match self {
            Self::Material(_) => CellKind::Material,
            Self::Fill(_) => CellKind::Fill,
        }
    }

    /// Universe the cell belongs to, once added to one.
    pub fn universe(&self) -> Option<UniverseId> {
        match self {
            Self::Material(c) => c.universe,
            Self::Fill(c) => c.universe,
        }
    }

    /// Re-parent the cell. Called by the owning universe on insertion.
    pub fn set_universe(&mut self, universe: UniverseId) {
        match self {
            Self::Material(c) => c.universe = Some(universe),
            Self::Fill(c) => c.universe = Some(universe),
        }
    }

    /// Bounding half-spaces.
    pub fn bounds(&self) -> &[Bound] {
        match self {
            Self::Material(c) => &c.bounds,
            Self::Fill(c) => &c.bounds,
        }
    }

    /// Material of a material cell.
    pub fn material(&self) -> Option<MaterialId> {
        match self {
            Self::Material(c) => Some(c.material),
            Self::Fill(_) => None,
        }
    }

    /// Filling universe of a fill cell.
    pub fn fill(&self) -> Option<UniverseId> {
        match self {
            Self::Material(_) => None,
            Self::Fill(c) => Some(c.fill),
        }
    }

    /// Borrow as a material cell.
    pub fn as_material(&self) -> Option<&MaterialCell> {
        match self {
            Self::Material(c) => Some(c),
            Self::Fill(_) => None,
        }
    }

    /// Borrow as a fill cell.
    pub fn as_fill(&self) -> Option<&FillCell> {
        match self {
            Self::Material(_) => None,
            Self::Fill(c) => Some(c),
        }
    }

    /// Whether `point` lies inside every bounding half-space, treating
    /// points within `threshold` of a surface as inside.
    ///
    /// A cell with no bounds contains the whole plane.
    pub fn contains(&self, point: Point, threshold: f64) -> bool {
        bounds_contain(self.bounds(), point, threshold)
    }

    /// Distance along `direction` from `point` to the nearest bounding
    /// surface ahead, or infinity when no bound is ahead.
    ///
    /// Does not require `point` to be inside the cell.
    pub fn min_surface_distance(&self, point: Point, direction: Direction) -> f64 {
        bounds_min_distance(self.bounds(), point, direction)
    }
}

impl From<MaterialCell> for Cell {
    fn from(c: MaterialCell) -> Self {
        Self::Material(c)
    }
}

impl From<FillCell> for Cell {
    fn from(c: FillCell) -> Self {
        Self::Fill(c)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell ID = {}, type = {}", self.id(), self.kind())?;
        if let Some(u) = self.universe() {
            write!(f, ", universe = {u}")?;
        }
        match self {
            Self::Material(c) => write!(
                f,
                ", material = {}, num rings = {}, num sectors = {}",
                c.material, c.rings, c.sectors
            )?,
            Self::Fill(c) => write!(f, ", fill = {}", c.fill)?,
        }
        write_bounds(f, self.bounds())
    }
}

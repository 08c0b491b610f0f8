//! Per-query coordinate cursor: one level record per hierarchy level.

use smallvec::SmallVec;
use strata_core::{CellId, Direction, Point, UniverseId};

/// What kind of universe a cursor level sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelKind {
    /// A simple universe, located by scanning its cells.
    Universe,
    /// A lattice; carries the grid indices of the visited lattice cell.
    Lattice {
        /// Column index.
        x: usize,
        /// Row index.
        y: usize,
    },
}

/// Position of a query at one level of the universe hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    point: Point,
    universe: UniverseId,
    cell: Option<CellId>,
    kind: LevelKind,
}

impl Level {
    fn new(point: Point, universe: UniverseId) -> Self {
        Self {
            point,
            universe,
            cell: None,
            kind: LevelKind::Universe,
        }
    }

    /// Point in this level's local coordinates.
    pub fn point(&self) -> Point {
        self.point
    }

    /// Universe (or lattice) this level sits in.
    pub fn universe(&self) -> UniverseId {
        self.universe
    }

    /// Cell found at this level, if the level is a simple universe and a
    /// containing cell was found.
    pub fn cell(&self) -> Option<CellId> {
        self.cell
    }

    /// Level kind.
    pub fn kind(&self) -> LevelKind {
        self.kind
    }

    /// `(x, y)` grid indices for lattice levels.
    pub fn grid_indices(&self) -> Option<(usize, usize)> {
        match self.kind {
            LevelKind::Lattice { x, y } => Some((x, y)),
            LevelKind::Universe => None,
        }
    }
}

/// Owned stack of [`Level`]s threading one query through nested universes.
///
/// Level 0 holds the global point and the starting universe. Cell finding
/// writes one level per universe it descends into and, once it finishes,
/// drops any deeper levels left over from a previous query, so after a
/// query the cursor holds exactly the levels that query visited. Levels
/// are reused in place, which makes a cursor cheap to recycle across the
/// segments of a track.
///
/// # Examples
///
/// ```
/// use strata_core::{Point, UniverseId};
/// use strata_universe::Cursor;
///
/// let cursor = Cursor::new(Point::new(0.5, 0.5), UniverseId(0));
/// assert_eq!(cursor.len(), 1);
/// assert_eq!(cursor.root().universe(), UniverseId(0));
/// assert_eq!(cursor.cell(), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Cursor {
    levels: SmallVec<[Level; 4]>,
}

impl Cursor {
    /// A cursor at global `point`, starting in `universe`.
    pub fn new(point: Point, universe: UniverseId) -> Self {
        let mut levels = SmallVec::new();
        levels.push(Level::new(point, universe));
        Self { levels }
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always returns `false`: the root level always exists.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All levels, root first.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Level at `depth`, if present.
    pub fn level(&self, depth: usize) -> Option<&Level> {
        self.levels.get(depth)
    }

    /// The root level (global coordinates).
    pub fn root(&self) -> &Level {
        &self.levels[0]
    }

    /// The deepest level.
    pub fn lowest(&self) -> &Level {
        &self.levels[self.levels.len() - 1]
    }

    /// Global point.
    pub fn point(&self) -> Point {
        self.root().point
    }

    /// Cell found by the last query: the deepest level's cell.
    pub fn cell(&self) -> Option<CellId> {
        self.lowest().cell
    }

    /// Move the cursor to a new global point and starting universe,
    /// discarding all deeper levels.
    pub fn reset(&mut self, point: Point, universe: UniverseId) {
        self.levels.truncate(1);
        self.levels[0] = Level::new(point, universe);
    }

    /// Translate every level by `distance` along `direction`.
    ///
    /// Levels only differ by translations, so the same displacement applies
    /// at every depth. Cell and lattice indices are left untouched; they go
    /// stale once the point crosses a boundary and the next cell-finding
    /// query rewrites them.
    pub fn advance(&mut self, distance: f64, direction: Direction) {
        for level in &mut self.levels {
            level.point = level.point.advance(distance, direction);
        }
    }

    /// Re-enter level 0 in `universe`, keeping the global point.
    pub(crate) fn enter(&mut self, universe: UniverseId) {
        let point = self.levels[0].point;
        self.levels[0] = Level::new(point, universe);
    }

    /// Tag level `depth` with `kind`, clearing any stale cell.
    pub(crate) fn mark(&mut self, depth: usize, kind: LevelKind) {
        let level = &mut self.levels[depth];
        level.kind = kind;
        level.cell = None;
    }

    pub(crate) fn set_cell(&mut self, depth: usize, cell: CellId) {
        self.levels[depth].cell = Some(cell);
    }

    /// Write level `depth + 1` at `point` in `universe`, reusing the slot
    /// when it already exists.
    pub(crate) fn descend(&mut self, depth: usize, point: Point, universe: UniverseId) {
        let next = Level::new(point, universe);
        match self.levels.get_mut(depth + 1) {
            Some(level) => *level = next,
            None => self.levels.push(next),
        }
    }

    /// Drop every level below `depth`.
    pub(crate) fn prune(&mut self, depth: usize) {
        self.levels.truncate(depth + 1);
    }
}

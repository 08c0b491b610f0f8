//! Regular-grid universes.
//!
//! A [`Lattice`] places a `num_x * num_y` array of equal rectangular cells
//! around its center offset and fills each cell with another universe.
//! Point location and nearest-surface distance are index arithmetic
//! instead of a cell scan.
//!
//! # Grid lines and the on-surface threshold
//!
//! Index lookup works on the coordinate measured from the low outer edge,
//! `from_low = c + n*w/2 - offset`:
//!
//! - `from_low` more than the threshold below `0` or above `n*w` is out of
//!   bounds;
//! - within the threshold of a grid line `k`, the index is `k`, so a point
//!   on an internal line belongs to the cell whose lower boundary it
//!   touches;
//! - otherwise the index is `floor(from_low / w)`;
//! - finally the index is clamped to `[0, n-1]`, which maps points on (or
//!   just past) the high outer edge into the last cell.
//!
//! [`Lattice::within_bounds`] uses the same test, so it is true exactly
//! when both index lookups succeed.

use crate::cursor::{Cursor, LevelKind};
use crate::grid::{CellSide, GridCell, LatticeGrid, LatticeSurface};
use crate::table::{UniverseSlot, UniverseTable};
use std::fmt;
use strata_cell::Cell;
use strata_core::{
    Axis, Direction, GeometryError, Point, UniverseId, UniverseUid, ON_SURFACE_THRESHOLD,
};

/// A universe made of a regular grid of sub-universes.
#[derive(Clone, Debug)]
pub struct Lattice {
    id: UniverseId,
    uid: UniverseUid,
    fissionable: Option<bool>,
    width_x: f64,
    width_y: f64,
    offset: Point,
    grid: LatticeGrid,
    threshold: f64,
}

impl Lattice {
    /// An empty lattice with cells of `width_x * width_y`.
    ///
    /// Returns `Err(GeometryError::InvalidLattice)` unless both widths are
    /// finite and positive.
    pub fn new(
        id: UniverseId,
        uid: UniverseUid,
        width_x: f64,
        width_y: f64,
    ) -> Result<Self, GeometryError> {
        for (axis, width) in [(Axis::X, width_x), (Axis::Y, width_y)] {
            if !(width.is_finite() && width > 0.0) {
                return Err(GeometryError::InvalidLattice {
                    lattice: id,
                    reason: format!("{axis} width must be finite and positive, got {width}"),
                });
            }
        }
        Ok(Self {
            id,
            uid,
            fissionable: None,
            width_x,
            width_y,
            offset: Point::ORIGIN,
            grid: LatticeGrid::default(),
            threshold: ON_SURFACE_THRESHOLD,
        })
    }

    /// Use `threshold` for boundary classification instead of the default.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
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

    /// Cell width along x.
    pub fn width_x(&self) -> f64 {
        self.width_x
    }

    /// Cell width along y.
    pub fn width_y(&self) -> f64 {
        self.width_y
    }

    /// Number of columns.
    pub fn num_x(&self) -> usize {
        self.grid.num_x()
    }

    /// Number of rows.
    pub fn num_y(&self) -> usize {
        self.grid.num_y()
    }

    /// Center of the lattice in the enclosing universe's coordinates.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Move the lattice center.
    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    /// Boundary tolerance used by index lookup and surface classification.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The declared grid.
    pub fn grid(&self) -> &LatticeGrid {
        &self.grid
    }

    /// Declare the grid shape and the universe filling each cell.
    ///
    /// `ids` lists the rows from the **top** row down, left to right within
    /// a row. Any previous declaration and all bindings are discarded.
    pub fn set_grid_cells(
        &mut self,
        num_x: usize,
        num_y: usize,
        ids: &[UniverseId],
    ) -> Result<(), GeometryError> {
        self.grid = LatticeGrid::from_rows_top_down(num_x, num_y, ids).ok_or_else(|| {
            GeometryError::InvalidLattice {
                lattice: self.id,
                reason: format!(
                    "{} universe ids given for a {num_x} x {num_y} grid",
                    ids.len()
                ),
            }
        })?;
        Ok(())
    }

    /// Bind every cell declaring `universe` to the table slot `slot`.
    ///
    /// Can be called repeatedly; the last binding wins. Returns the number
    /// of cells bound, and logs a warning when `universe` is not in the
    /// grid at all.
    pub fn bind_universe(&mut self, universe: UniverseId, slot: UniverseSlot) -> usize {
        let bound = self.grid.bind(universe, slot);
        if bound == 0 {
            tracing::warn!(lattice = %self.id, %universe, "universe is not declared in lattice grid");
        } else {
            tracing::info!(lattice = %self.id, %universe, cells = bound, "bound lattice cells");
        }
        bound
    }

    /// Cell at `(x, y)`, with `(0, 0)` at the bottom left.
    pub fn universe_at(&self, x: usize, y: usize) -> Result<&GridCell, GeometryError> {
        if x >= self.num_x() {
            return Err(self.index_out_of_bounds(Axis::X, x));
        }
        self.grid
            .get(x, y)
            .ok_or_else(|| self.index_out_of_bounds(Axis::Y, y))
    }

    fn index_out_of_bounds(&self, axis: Axis, index: usize) -> GeometryError {
        GeometryError::OutOfBounds {
            lattice: self.id,
            axis,
            coordinate: index as f64,
            count: self.axis(axis).0,
        }
    }

    /// Count, width and offset along `axis`.
    fn axis(&self, axis: Axis) -> (usize, f64, f64) {
        match axis {
            Axis::X => (self.num_x(), self.width_x, self.offset.x),
            Axis::Y => (self.num_y(), self.width_y, self.offset.y),
        }
    }

    /// Low outer edge along `axis`.
    fn low_edge(&self, axis: Axis) -> f64 {
        let (n, w, o) = self.axis(axis);
        o - n as f64 * w / 2.0
    }

    /// Distance from the low outer edge, if within the widened extent.
    fn from_low(&self, axis: Axis, coordinate: f64) -> Option<f64> {
        let (n, w, _) = self.axis(axis);
        let from_low = coordinate - self.low_edge(axis);
        let extent = n as f64 * w;
        // NaN fails both comparisons.
        (n > 0 && from_low >= -self.threshold && from_low <= extent + self.threshold)
            .then_some(from_low)
    }

    fn grid_index(&self, axis: Axis, coordinate: f64) -> Result<usize, GeometryError> {
        let (n, w, _) = self.axis(axis);
        let from_low = self
            .from_low(axis, coordinate)
            .ok_or(GeometryError::OutOfBounds {
                lattice: self.id,
                axis,
                coordinate,
                count: n,
            })?;
        let t = from_low / w;
        let nearest = t.round();
        let index = if (t - nearest).abs() * w <= self.threshold {
            nearest
        } else {
            t.floor()
        };
        Ok((index.max(0.0) as usize).min(n - 1))
    }

    /// Column containing `point`.
    pub fn grid_x(&self, point: Point) -> Result<usize, GeometryError> {
        self.grid_index(Axis::X, point.x)
    }

    /// Row containing `point`.
    pub fn grid_y(&self, point: Point) -> Result<usize, GeometryError> {
        self.grid_index(Axis::Y, point.y)
    }

    /// Flat index `y * num_x + x` of the cell containing `point`.
    pub fn lattice_cell(&self, point: Point) -> Result<usize, GeometryError> {
        let x = self.grid_x(point)?;
        let y = self.grid_y(point)?;
        Ok(y * self.num_x() + x)
    }

    /// Whether `point` lies inside the lattice's closed outer boundary,
    /// widened by the threshold.
    pub fn within_bounds(&self, point: Point) -> bool {
        self.from_low(Axis::X, point.x).is_some() && self.from_low(Axis::Y, point.y).is_some()
    }

    /// Center of cell `(x, y)` in the enclosing universe's coordinates, or
    /// `None` outside the grid.
    pub fn cell_center(&self, x: usize, y: usize) -> Option<Point> {
        self.grid.index(x, y)?;
        Some(self.center_of(x, y))
    }

    fn center_of(&self, x: usize, y: usize) -> Point {
        Point::new(
            self.low_edge(Axis::X) + (x as f64 + 0.5) * self.width_x,
            self.low_edge(Axis::Y) + (y as f64 + 0.5) * self.width_y,
        )
    }

    /// Locate the cell containing the point at cursor level `depth`.
    ///
    /// A point outside the grid is `Ok(None)` and leaves the level tagged
    /// as a plain universe level, since it has no grid indices.
    pub(crate) fn locate<'a>(
        &'a self,
        cursor: &mut Cursor,
        depth: usize,
        table: &'a UniverseTable,
    ) -> Result<Option<&'a Cell>, GeometryError> {
        let point = cursor.levels()[depth].point();
        let (Ok(x), Ok(y)) = (self.grid_x(point), self.grid_y(point)) else {
            cursor.mark(depth, LevelKind::Universe);
            cursor.prune(depth);
            return Ok(None);
        };
        cursor.mark(depth, LevelKind::Lattice { x, y });

        let cell = self.universe_at(x, y)?;
        let slot = cell.bound().ok_or(GeometryError::UnboundLatticeCell {
            lattice: self.id,
            x,
            y,
            universe: cell.declared(),
        })?;
        let next = table
            .universe_at(slot)
            .ok_or(GeometryError::UniverseNotFound {
                universe: cell.declared(),
            })?;

        cursor.descend(depth, point - self.center_of(x, y), next.id());
        next.locate(cursor, depth + 1, table)
    }

    /// Distance along `direction` to the nearest grid line ahead of `point`.
    ///
    /// Lines at or within the threshold of the point are skipped, so a
    /// point sitting on a cell boundary gets the distance across the next
    /// cell rather than zero. Returns `Err(GeometryError::OutOfBounds)`
    /// when `point` is outside the lattice.
    pub fn min_surface_distance(
        &self,
        point: Point,
        direction: Direction,
    ) -> Result<f64, GeometryError> {
        let x = self.grid_x(point)?;
        let y = self.grid_y(point)?;
        let along_x = self.line_distance(Axis::X, x, point.x, direction.cos());
        let along_y = self.line_distance(Axis::Y, y, point.y, direction.sin());
        Ok(along_x.min(along_y))
    }

    fn line_distance(&self, axis: Axis, index: usize, coordinate: f64, component: f64) -> f64 {
        if component == 0.0 {
            return f64::INFINITY;
        }
        let (_, w, _) = self.axis(axis);
        let low = self.low_edge(axis);
        let line = |k: f64| low + k * w;
        let target = if component > 0.0 {
            let next = line(index as f64 + 1.0);
            if next - coordinate <= self.threshold {
                line(index as f64 + 2.0)
            } else {
                next
            }
        } else {
            let next = line(index as f64);
            if coordinate - next <= self.threshold {
                line(index as f64 - 1.0)
            } else {
                next
            }
        };
        (target - coordinate) / component
    }

    /// Which piece of the boundary of lattice cell `cell` the point lies on.
    ///
    /// `point` is in the lattice's own coordinates. Corners take priority
    /// over edges. Returns `None` when the point is on no boundary of the
    /// cell, or when `cell` is not in the grid.
    pub fn grid_surface(&self, cell: usize, point: Point) -> Option<LatticeSurface> {
        let nx = self.num_x();
        if cell >= self.grid.len() || nx == 0 {
            return None;
        }
        let (x, y) = (cell % nx, cell / nx);
        let left = self.low_edge(Axis::X) + x as f64 * self.width_x;
        let bottom = self.low_edge(Axis::Y) + y as f64 * self.width_y;
        let near = |a: f64, b: f64| (a - b).abs() <= self.threshold;

        let on_left = near(point.x, left);
        let on_right = near(point.x, left + self.width_x);
        let on_bottom = near(point.y, bottom);
        let on_top = near(point.y, bottom + self.width_y);

        let side = if on_left {
            if on_bottom {
                CellSide::BottomLeft
            } else if on_top {
                CellSide::TopLeft
            } else {
                CellSide::Left
            }
        } else if on_right {
            if on_bottom {
                CellSide::BottomRight
            } else if on_top {
                CellSide::TopRight
            } else {
                CellSide::Right
            }
        } else if on_bottom {
            CellSide::Bottom
        } else if on_top {
            CellSide::Top
        } else {
            return None;
        };
        Some(LatticeSurface { cell, side })
    }

    /// Flat index of the cell a ray enters when it leaves `surface.cell`
    /// through `surface.side`, or `None` when it leaves the lattice.
    pub fn neighbour_cell(&self, surface: LatticeSurface) -> Option<usize> {
        let nx = self.num_x();
        if surface.cell >= self.grid.len() || nx == 0 {
            return None;
        }
        let (dx, dy) = surface.side.step();
        let x = (surface.cell % nx).checked_add_signed(dx)?;
        let y = (surface.cell / nx).checked_add_signed(dy)?;
        self.grid.index(x, y)
    }

    /// Declared filling universes, bottom row first, left to right.
    pub fn nested_universe_ids(&self) -> Vec<UniverseId> {
        self.grid.iter().map(GridCell::declared).collect()
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lattice ID = {}, num cells along x = {}, num cells along y = {}, \
             x width = {}, y width = {}",
            self.id,
            self.num_x(),
            self.num_y(),
            self.width_x,
            self.width_y
        )?;
        write!(f, "\n\tUniverse IDs within this lattice: ")?;
        for y in (0..self.num_y()).rev() {
            for x in 0..self.num_x() {
                if let Some(cell) = self.grid.get(x, y) {
                    write!(f, "{}, ", cell.declared())?;
                }
            }
            write!(f, "\n\t")?;
        }
        Ok(())
    }
}

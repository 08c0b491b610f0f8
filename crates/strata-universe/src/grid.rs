//! Flat storage for lattice cells and the lattice-cell boundary encoding.

use crate::table::UniverseSlot;
use strata_core::UniverseId;

/// One lattice cell: the declared filling universe and, once bound, the
/// table slot it resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    declared: UniverseId,
    bound: Option<UniverseSlot>,
}

impl GridCell {
    /// Declared filling universe.
    pub fn declared(&self) -> UniverseId {
        self.declared
    }

    /// Bound table slot, if binding has happened.
    pub fn bound(&self) -> Option<UniverseSlot> {
        self.bound
    }
}

/// Row-major `num_x * num_y` grid, row 0 at the bottom.
///
/// The shape is fixed at construction; only the bindings change
/// afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LatticeGrid {
    num_x: usize,
    num_y: usize,
    cells: Vec<GridCell>,
}

impl LatticeGrid {
    /// Build a grid from ids listed row by row starting with the **top**
    /// row, the way a lattice is drawn on paper.
    ///
    /// Returns `None` unless `ids.len() == num_x * num_y`.
    pub fn from_rows_top_down(num_x: usize, num_y: usize, ids: &[UniverseId]) -> Option<Self> {
        if num_x.checked_mul(num_y)? != ids.len() {
            return None;
        }
        let mut cells = Vec::with_capacity(ids.len());
        for y in 0..num_y {
            let row = num_y - 1 - y;
            for &declared in &ids[row * num_x..(row + 1) * num_x] {
                cells.push(GridCell {
                    declared,
                    bound: None,
                });
            }
        }
        Some(Self {
            num_x,
            num_y,
            cells,
        })
    }

    /// Number of columns.
    pub fn num_x(&self) -> usize {
        self.num_x
    }

    /// Number of rows.
    pub fn num_y(&self) -> usize {
        self.num_y
    }

    /// Total number of lattice cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of `(x, y)`, or `None` outside the grid.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.num_x && y < self.num_y).then(|| y * self.num_x + x)
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<&GridCell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Cells in row-major order, bottom row first.
    pub fn iter(&self) -> impl Iterator<Item = &GridCell> + '_ {
        self.cells.iter()
    }

    /// Whether every cell has been bound.
    pub fn is_fully_bound(&self) -> bool {
        self.cells.iter().all(|c| c.bound.is_some())
    }

    /// Point every cell declaring `universe` at `slot`. Returns how many
    /// cells were bound.
    pub(crate) fn bind(&mut self, universe: UniverseId, slot: UniverseSlot) -> usize {
        let mut count = 0;
        for cell in self.cells.iter_mut().filter(|c| c.declared == universe) {
            cell.bound = Some(slot);
            count += 1;
        }
        count
    }
}

/// One of the eight boundary pieces of a lattice cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellSide {
    /// Left edge.
    Left = 0,
    /// Bottom edge.
    Bottom = 1,
    /// Right edge.
    Right = 2,
    /// Top edge.
    Top = 3,
    /// Bottom-left corner.
    BottomLeft = 4,
    /// Bottom-right corner.
    BottomRight = 5,
    /// Top-right corner.
    TopRight = 6,
    /// Top-left corner.
    TopLeft = 7,
}

impl CellSide {
    /// All sides in encoding order.
    pub const ALL: [CellSide; 8] = [
        CellSide::Left,
        CellSide::Bottom,
        CellSide::Right,
        CellSide::Top,
        CellSide::BottomLeft,
        CellSide::BottomRight,
        CellSide::TopRight,
        CellSide::TopLeft,
    ];

    /// Whether this is one of the four corners.
    pub fn is_corner(self) -> bool {
        self as u8 >= 4
    }

    /// Grid step `(dx, dy)` taken when a ray leaves the cell through this
    /// side.
    pub fn step(self) -> (isize, isize) {
        match self {
            Self::Left => (-1, 0),
            Self::Bottom => (0, -1),
            Self::Right => (1, 0),
            Self::Top => (0, 1),
            Self::BottomLeft => (-1, -1),
            Self::BottomRight => (1, -1),
            Self::TopRight => (1, 1),
            Self::TopLeft => (-1, 1),
        }
    }
}

/// A boundary piece of a specific lattice cell.
///
/// Encoded as `8 * cell + side`, which gives every boundary piece of the
/// lattice a dense integer id for ray-tracking tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LatticeSurface {
    /// Flat lattice cell index (`y * num_x + x`).
    pub cell: usize,
    /// Which piece of that cell's boundary.
    pub side: CellSide,
}

impl LatticeSurface {
    /// Dense encoding `8 * cell + side`.
    pub fn index(&self) -> usize {
        8 * self.cell + self.side as usize
    }

    /// Decode an [`index`](Self::index) value.
    pub fn from_index(index: usize) -> Self {
        Self {
            cell: index / 8,
            side: CellSide::ALL[index % 8],
        }
    }
}

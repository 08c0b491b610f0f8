//! Error types for geometry construction and spatial queries.
//!
//! Lookups that are part of normal recursive descent (a point outside a
//! lattice, a point in no cell) are not errors: they surface as `Ok(None)`
//! from the cell-finding routines. The variants here cover caller mistakes
//! and configuration faults.

use crate::id::{CellId, SurfaceId, UniverseId};
use crate::kind::{Axis, CellKind, UniverseKind};
use thiserror::Error;

/// Errors arising from geometry construction or spatial queries.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// An explicitly requested cell is not in the universe.
    #[error("universe {universe} does not contain cell {cell}")]
    CellNotFound {
        /// Universe that was searched.
        universe: UniverseId,
        /// The missing cell.
        cell: CellId,
    },
    /// A universe id is not registered in the universe table.
    #[error("universe {universe} is not registered")]
    UniverseNotFound {
        /// The missing universe.
        universe: UniverseId,
    },
    /// A lattice cell was visited before its universe was bound.
    #[error("lattice {lattice} cell ({x}, {y}) declares universe {universe} but it is not bound")]
    UnboundLatticeCell {
        /// The lattice.
        lattice: UniverseId,
        /// Column index.
        x: usize,
        /// Row index.
        y: usize,
        /// Declared filling universe.
        universe: UniverseId,
    },
    /// A lattice index fell outside the declared grid.
    #[error("lattice {lattice} {axis} index for coordinate {coordinate} is outside [0, {count})")]
    OutOfBounds {
        /// The lattice.
        lattice: UniverseId,
        /// Axis along which the index was computed.
        axis: Axis,
        /// The offending coordinate (or index, for index accessors).
        coordinate: f64,
        /// Number of grid cells along `axis`.
        count: usize,
    },
    /// The operation is not defined for this geometry.
    #[error("unsupported operation: {reason}")]
    UnsupportedOperation {
        /// What was attempted and why it cannot be done.
        reason: String,
    },
    /// A typed cell accessor found the other cell variant.
    ///
    /// Non-fatal: accessors log it and still return the cell.
    #[error("cell {cell} in universe {universe} is not a {expected} cell")]
    CellTypeMismatch {
        /// Universe holding the cell.
        universe: UniverseId,
        /// The cell.
        cell: CellId,
        /// Variant the caller asked for.
        expected: CellKind,
    },
    /// A typed universe accessor found the other universe variant.
    #[error("universe {universe} is not a {expected} universe")]
    UniverseTypeMismatch {
        /// The universe.
        universe: UniverseId,
        /// Variant the caller asked for.
        expected: UniverseKind,
    },
    /// A cell id is already used in the universe.
    #[error("universe {universe} already contains cell {cell}")]
    DuplicateCell {
        /// The universe.
        universe: UniverseId,
        /// The duplicated cell id.
        cell: CellId,
    },
    /// A universe id is already registered.
    #[error("universe {universe} is already registered")]
    DuplicateUniverse {
        /// The duplicated universe id.
        universe: UniverseId,
    },
    /// A user-supplied id lies in the auto-generated range.
    #[error("id {id} is reserved for auto-generated ids (>= {offset})")]
    ReservedId {
        /// The rejected id.
        id: u32,
        /// Start of the reserved range.
        offset: u32,
    },
    /// Lattice parameters are invalid.
    #[error("invalid lattice {lattice}: {reason}")]
    InvalidLattice {
        /// The lattice.
        lattice: UniverseId,
        /// What went wrong.
        reason: String,
    },
    /// A cell cannot be subdivided or constructed as requested.
    #[error("invalid cell {cell}: {reason}")]
    InvalidCell {
        /// The cell.
        cell: CellId,
        /// What went wrong.
        reason: String,
    },
    /// A surface has invalid coefficients.
    #[error("invalid surface {surface}: {reason}")]
    InvalidSurface {
        /// The surface.
        surface: SurfaceId,
        /// What went wrong.
        reason: String,
    },
    /// The universe containment graph has a cycle.
    #[error("universe {universe} is nested inside itself")]
    CyclicNesting {
        /// A universe on the cycle.
        universe: UniverseId,
    },
}

//! Type tags shared across the geometry crates.

use std::fmt;

/// Variant tag of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Leaf cell filled with a material.
    Material,
    /// Cell that is a window into a nested universe.
    Fill,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Material => write!(f, "MATERIAL"),
            Self::Fill => write!(f, "FILL"),
        }
    }
}

/// Variant tag of a universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniverseKind {
    /// Plain collection of cells, located by linear scan.
    Simple,
    /// Regular rectangular grid of nested universes.
    Lattice,
}

impl fmt::Display for UniverseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "SIMPLE"),
            Self::Lattice => write!(f, "LATTICE"),
        }
    }
}

/// A coordinate axis of the x-y plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

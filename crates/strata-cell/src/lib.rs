//! Cells and bounding surfaces for strata geometries.
//!
//! A [`Cell`] is the leaf region type that universes are built from. It
//! answers the two questions the universe layer asks of it: does a point
//! lie inside me, and how far along a ray is my nearest bounding surface.
//! Material cells can additionally be expanded into ring and sector
//! subcells and cloned under a new id.
//!
//! # Surfaces
//!
//! - [`SurfaceKind::Plane`], [`SurfaceKind::XPlane`], [`SurfaceKind::YPlane`]: lines
//! - [`SurfaceKind::Circle`]: circles (fuel pins, rings)

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod subdivide;
pub mod surface;

pub use cell::{Bounds, Cell, FillCell, MaterialCell};
pub use surface::{Bound, Halfspace, Surface, SurfaceKind};

//! Core types for the strata geometry kernel.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! identifiers, planar points and directions, type tags, the error enum
//! and the configuration shared by the cell and universe crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod id;
pub mod kind;
pub mod point;

pub use config::{ConfigError, GeometryConfig, ON_SURFACE_THRESHOLD};
pub use error::GeometryError;
pub use id::{CellId, IdAllocator, MaterialId, SurfaceId, UniverseId, UniverseUid, AUTO_ID_OFFSET};
pub use kind::{Axis, CellKind, UniverseKind};
pub use point::{Direction, Point};

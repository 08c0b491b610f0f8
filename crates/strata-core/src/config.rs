//! Geometry configuration and validation.
//!
//! [`GeometryConfig`] is the builder-input for a universe table. It is
//! validated once when the table is created; queries never re-check it.

use crate::id::AUTO_ID_OFFSET;
use thiserror::Error;

/// Default absolute tolerance for classifying a point as lying on a surface.
pub const ON_SURFACE_THRESHOLD: f64 = 1e-12;

/// Errors detected during [`GeometryConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The on-surface threshold is NaN, infinite or negative.
    #[error("on_surface_threshold must be finite and non-negative, got {value}")]
    InvalidThreshold {
        /// The invalid value.
        value: f64,
    },
    /// The auto id offset leaves no room for user ids.
    #[error("auto_id_offset must be at least 1")]
    ZeroIdOffset,
}

/// Tunables shared by every universe and lattice of one geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryConfig {
    /// Absolute distance under which a point counts as lying on a surface
    /// or a lattice grid line. Default: `1e-12`.
    pub on_surface_threshold: f64,
    /// First auto-generated universe, cell and surface id. User ids must
    /// stay below it. Default: `10000`.
    pub auto_id_offset: u32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            on_surface_threshold: ON_SURFACE_THRESHOLD,
            auto_id_offset: AUTO_ID_OFFSET,
        }
    }
}

impl GeometryConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.on_surface_threshold;
        if !t.is_finite() || t < 0.0 {
            return Err(ConfigError::InvalidThreshold { value: t });
        }
        if self.auto_id_offset == 0 {
            return Err(ConfigError::ZeroIdOffset);
        }
        Ok(())
    }
}

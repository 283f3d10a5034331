//! Collider construction settings

use super::{Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Options that control how chunk trees and world colliders are built
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderSettings {
    /// Build a naive single-leaf tree for world chunks without collision data
    /// instead of leaving them out of the collider
    pub synthesize_missing_trees: bool,

    /// Slack allowed when checking a supplied chunk box against its triangles
    pub bounds_tolerance: f32,

    /// Check supplied chunk boxes; when off they are replaced by computed ones
    pub validate_bounds: bool,

    /// Merge bit-identical vertex positions in local triangle sources
    pub deduplicate_local_vertices: bool,
}

impl Default for ColliderSettings {
    fn default() -> Self {
        Self {
            synthesize_missing_trees: false,
            bounds_tolerance: 1e-3,
            validate_bounds: true,
            deduplicate_local_vertices: true,
        }
    }
}

impl ColliderSettings {
    /// Builder: toggle naive tree synthesis for chunks without collision data
    #[must_use]
    pub const fn with_synthesized_trees(mut self, enabled: bool) -> Self {
        self.synthesize_missing_trees = enabled;
        self
    }

    /// Builder: set the bounds tolerance
    #[must_use]
    pub const fn with_bounds_tolerance(mut self, tolerance: f32) -> Self {
        self.bounds_tolerance = tolerance;
        self
    }

    /// Builder: toggle bounds validation
    #[must_use]
    pub const fn with_bounds_validation(mut self, enabled: bool) -> Self {
        self.validate_bounds = enabled;
        self
    }

    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.bounds_tolerance >= 0.0 && self.bounds_tolerance.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "bounds_tolerance must be finite and non-negative, got {}",
                self.bounds_tolerance
            )));
        }
        Ok(())
    }
}

impl Config for ColliderSettings {}

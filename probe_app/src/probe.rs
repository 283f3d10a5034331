//! Probe scene files: a world plus the rays and shapes to fire at it

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use world_collision::prelude::*;

/// Errors raised while loading a probe scene or building its world
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Scene file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending file
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Scene file is not valid RON for a probe scene
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Offending file
        path: String,
        /// Underlying error
        source: ron::error::SpannedError,
    },

    /// Settings file could not be loaded
    #[error(transparent)]
    Config(#[from] world_collision::config::ConfigError),

    /// World data is corrupt
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// A ray to cast, with an optional length limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RayProbe {
    /// Label used in the log output
    pub name: String,
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction; normalized on use
    pub direction: Vec3,
    /// Farthest distance worth reporting
    #[serde(default)]
    pub max_length: Option<f32>,
}

impl RayProbe {
    /// The probe as a query ray
    pub fn ray(&self) -> Ray {
        Ray::new(self.origin, self.direction)
    }
}

/// Shape description as written in scene files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShapeDescription {
    /// Axis-aligned box
    Box {
        /// Lower corner
        min: Vec3,
        /// Upper corner
        max: Vec3,
    },
    /// Sphere
    Sphere {
        /// Center
        center: Vec3,
        /// Radius
        radius: f32,
    },
    /// Segment
    Segment {
        /// Start point
        start: Vec3,
        /// End point
        end: Vec3,
    },
    /// Triangle
    Triangle {
        /// Vertices in winding order
        vertices: [Vec3; 3],
    },
}

impl From<&ShapeDescription> for Shape {
    fn from(description: &ShapeDescription) -> Self {
        match *description {
            ShapeDescription::Box { min, max } => Self::Aabb(Aabb::new(min, max)),
            ShapeDescription::Sphere { center, radius } => Self::Sphere(Sphere::new(center, radius)),
            ShapeDescription::Segment { start, end } => Self::Segment(Segment::new(start, end)),
            ShapeDescription::Triangle { vertices: [a, b, c] } => {
                Self::Triangle(Triangle::new(a, b, c))
            }
        }
    }
}

/// A shape to test for overlaps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeProbe {
    /// Label used in the log output
    pub name: String,
    /// The shape
    pub shape: ShapeDescription,
}

/// World plus the probes to fire at it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeScene {
    /// World geometry
    pub world: WorldData,
    /// Ray probes
    #[serde(default)]
    pub rays: Vec<RayProbe>,
    /// Shape probes
    #[serde(default)]
    pub shapes: Vec<ShapeProbe>,
}

impl ProbeScene {
    /// Load a scene from a RON file
    pub fn load(path: &Path) -> Result<Self, ProbeError> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ProbeError::Io {
            path: display.clone(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ProbeError::Parse {
            path: display,
            source,
        })
    }
}

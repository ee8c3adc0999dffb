//! Polyview Core Library - Platonic solids, transformation matrices and projection
//!
//! This library provides the rendering-independent core of the viewer:
//! homogeneous points and polygons, 4x4 transformation builders, the five
//! Platonic solids, axonometric and perspective projection, and a scene
//! driven by textual or key-bound actions.

pub mod action;
pub mod error;
pub mod geometry;
pub mod polyhedron;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use action::{parse_action, parse_script, Action, Preset, TransformKind};
pub use error::{ActionError, GeometryError};
pub use geometry::{Point, Polygon};
pub use polyhedron::{Polyhedron, SolidKind};
pub use projection::{
    axonometric_project, perspective_project, Frame, ProjectedFace, ProjectionConfig,
    ProjectionMode, ScreenPoint, Viewport,
};
pub use scene::{Outcome, Scene};
pub use transform::{Axis, Plane, Transform};

/// Axonometric and perspective projection onto a 2D viewport
use std::fmt;
use std::str::FromStr;

use crate::error::ActionError;
use crate::geometry::Point;
use crate::polyhedron::Polyhedron;

/// Screen coordinate, x to the right and y downwards
pub type ScreenPoint = (f64, f64);

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Axonometric,
    Perspective,
}

impl ProjectionMode {
    pub fn name(self) -> &'static str {
        match self {
            ProjectionMode::Axonometric => "axonometric",
            ProjectionMode::Perspective => "perspective",
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionMode {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "axonometric" | "isometric" | "a" => Ok(ProjectionMode::Axonometric),
            "perspective" | "p" => Ok(ProjectionMode::Perspective),
            _ => Err(ActionError::UnknownProjection(s.to_string())),
        }
    }
}

/// Drawing surface size in pixels (or character cells)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> ScreenPoint {
        ((self.width / 2) as f64, (self.height / 2) as f64)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1000, 700)
    }
}

/// Projection constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub axonometric_scale: f64,
    pub perspective_scale: f64,
    /// Distance `d` from the eye to the projection plane
    pub eye_distance: f64,
    /// Extra horizontal factor for surfaces whose cells are not square
    pub x_stretch: f64,
}

impl ProjectionConfig {
    /// Multiply both projection scales by `factor`.
    pub fn zoomed(mut self, factor: f64) -> Self {
        self.axonometric_scale *= factor;
        self.perspective_scale *= factor;
        self
    }

    pub fn project(&self, mode: ProjectionMode, point: &Point, viewport: Viewport) -> ScreenPoint {
        match mode {
            ProjectionMode::Axonometric => to_screen(
                axonometric_plane(point),
                self.axonometric_scale,
                self.x_stretch,
                viewport,
            ),
            ProjectionMode::Perspective => match perspective_plane(point, self.eye_distance) {
                Some(plane) => to_screen(plane, self.perspective_scale, self.x_stretch, viewport),
                None => viewport.center(),
            },
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            axonometric_scale: 100.0,
            perspective_scale: 200.0,
            eye_distance: 5.0,
            x_stretch: 1.0,
        }
    }
}

/// Isometric projection: `(x - z, y + (x + z) / 2)`, scaled and centered.
pub fn axonometric_project(point: &Point, scale: f64, viewport: Viewport) -> ScreenPoint {
    to_screen(axonometric_plane(point), scale, 1.0, viewport)
}

/// Perspective projection with the eye at distance `d`.
///
/// When `z + d == 0` there is no finite image; the viewport center is
/// returned instead.
pub fn perspective_project(point: &Point, d: f64, scale: f64, viewport: Viewport) -> ScreenPoint {
    match perspective_plane(point, d) {
        Some(plane) => to_screen(plane, scale, 1.0, viewport),
        None => viewport.center(),
    }
}

fn axonometric_plane(point: &Point) -> (f64, f64) {
    let (x, y, z) = (point.x(), point.y(), point.z());
    (x - z, y + (x + z) * 0.5)
}

fn perspective_plane(point: &Point, d: f64) -> Option<(f64, f64)> {
    let denom = point.z() + d;
    if denom == 0.0 {
        return None;
    }
    Some((point.x() * d / denom, point.y() * d / denom))
}

fn to_screen((x, y): (f64, f64), scale: f64, x_stretch: f64, viewport: Viewport) -> ScreenPoint {
    let (cx, cy) = viewport.center();
    (x * scale * x_stretch + cx, -y * scale + cy)
}

/// A face projected to the screen, tagged with its index for colouring
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFace {
    pub index: usize,
    pub points: Vec<ScreenPoint>,
}

/// Everything a render target needs to draw one polyhedron
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Fillable faces (three or more points), in face order
    pub faces: Vec<ProjectedFace>,
    pub edges: Vec<(ScreenPoint, ScreenPoint)>,
    pub vertices: Vec<ScreenPoint>,
}

impl Frame {
    pub fn project(
        polyhedron: &Polyhedron,
        mode: ProjectionMode,
        config: &ProjectionConfig,
        viewport: Viewport,
    ) -> Self {
        let project = |p: &Point| config.project(mode, p, viewport);
        let mut frame = Frame::default();

        for (index, face) in polyhedron.faces().iter().enumerate() {
            if face.len() >= 3 {
                frame.faces.push(ProjectedFace {
                    index,
                    points: face.points().iter().map(project).collect(),
                });
            }
            frame
                .edges
                .extend(face.edges().map(|(a, b)| (project(a), project(b))));
        }
        frame.vertices = polyhedron.vertices().iter().map(project).collect();
        frame
    }
}

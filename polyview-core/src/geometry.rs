/// Geometry primitives: points with homogeneous conversion and polygon faces
use nalgebra::{Matrix4, Point3, Vector4};
use std::fmt;

use crate::error::{GeometryError, Result};

/// A 3D point, transformed in place through 4x4 homogeneous matrices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Point3<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// `(x, y, z, 1)`
    pub fn to_homogeneous(&self) -> Vector4<f64> {
        self.position.to_homogeneous()
    }

    /// Overwrite this point with `v.xyz / v.w`.
    ///
    /// Fails with [`GeometryError::DegenerateHomogeneousDivide`] when `w` is
    /// zero; the point is left untouched in that case.
    pub fn from_homogeneous(&mut self, v: &Vector4<f64>) -> Result<()> {
        self.position =
            Point3::from_homogeneous(*v).ok_or(GeometryError::DegenerateHomogeneousDivide)?;
        Ok(())
    }

    /// Apply `matrix` to this point in place: `p = M * p`.
    pub fn transform(&mut self, matrix: &Matrix4<f64>) -> Result<()> {
        let transformed = matrix * self.to_homogeneous();
        self.from_homogeneous(&transformed)
    }

    /// Return a transformed copy, leaving `self` unchanged.
    pub fn transformed(&self, matrix: &Matrix4<f64>) -> Result<Point> {
        let mut point = *self;
        point.transform(matrix)?;
        Ok(point)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::origin()
    }
}

impl From<Point3<f64>> for Point {
    fn from(position: Point3<f64>) -> Self {
        Self { position }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({:.2}, {:.2}, {:.2})", self.x(), self.y(), self.z())
    }
}

/// A polygon face owning its own copies of the corner points
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs, including the edge closing the loop.
    ///
    /// A two-point polygon (a debug segment) yields a single edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        let n = self.points.len();
        let count = match n {
            0 | 1 => 0,
            2 => 1,
            _ => n,
        };
        (0..count).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polygon with {} points", self.points.len())
    }
}

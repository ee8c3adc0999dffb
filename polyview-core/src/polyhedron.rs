/// Polyhedron model and the five Platonic solids
use nalgebra::{Matrix4, Point3};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{ActionError, GeometryError, Result};
use crate::geometry::{Point, Polygon};

/// Golden ratio
const PHI: f64 = 1.618_033_988_749_895;

/// The five Platonic solids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidKind {
    Tetrahedron,
    Hexahedron,
    Octahedron,
    Icosahedron,
    Dodecahedron,
}

impl SolidKind {
    pub const ALL: [SolidKind; 5] = [
        SolidKind::Tetrahedron,
        SolidKind::Hexahedron,
        SolidKind::Octahedron,
        SolidKind::Icosahedron,
        SolidKind::Dodecahedron,
    ];

    /// 1-based position used by the number keys.
    pub fn from_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            SolidKind::Tetrahedron => "Tetrahedron",
            SolidKind::Hexahedron => "Hexahedron (Cube)",
            SolidKind::Octahedron => "Octahedron",
            SolidKind::Icosahedron => "Icosahedron",
            SolidKind::Dodecahedron => "Dodecahedron",
        }
    }
}

impl fmt::Display for SolidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolidKind {
    type Err = ActionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tetrahedron" | "tetra" | "1" => Ok(SolidKind::Tetrahedron),
            "hexahedron" | "cube" | "2" => Ok(SolidKind::Hexahedron),
            "octahedron" | "octa" | "3" => Ok(SolidKind::Octahedron),
            "icosahedron" | "icosa" | "4" => Ok(SolidKind::Icosahedron),
            "dodecahedron" | "dodeca" | "5" => Ok(SolidKind::Dodecahedron),
            _ => Err(ActionError::UnknownSolid(s.to_string())),
        }
    }
}

/// A polyhedron: vertices plus faces holding their own copies of those vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Polyhedron {
    vertices: Vec<Point>,
    faces: Vec<Polygon>,
    center: Point,
}

impl Polyhedron {
    /// Build from explicit vertices and per-face vertex indices.
    pub fn new(vertices: Vec<Point>, faces_indices: &[Vec<usize>]) -> Result<Self> {
        let vertex_count = vertices.len();
        if let Some(&index) = faces_indices
            .iter()
            .flatten()
            .find(|&&index| index >= vertex_count)
        {
            return Err(GeometryError::FaceIndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(Self::from_tables(vertices, faces_indices))
    }

    fn from_tables<F: AsRef<[usize]>>(vertices: Vec<Point>, faces_indices: &[F]) -> Self {
        let faces = faces_indices
            .iter()
            .map(|face| Polygon::new(face.as_ref().iter().map(|&i| vertices[i]).collect()))
            .collect();
        let center = centroid_of(&vertices);
        Self {
            vertices,
            faces,
            center,
        }
    }

    pub fn from_kind(kind: SolidKind) -> Self {
        match kind {
            SolidKind::Tetrahedron => Self::tetrahedron(),
            SolidKind::Hexahedron => Self::hexahedron(),
            SolidKind::Octahedron => Self::octahedron(),
            SolidKind::Icosahedron => Self::icosahedron(),
            SolidKind::Dodecahedron => Self::dodecahedron(),
        }
    }

    /// 4 vertices, 4 triangles
    pub fn tetrahedron() -> Self {
        let vertices = vec![
            Point::new(1.0, 1.0, 1.0),
            Point::new(1.0, -1.0, -1.0),
            Point::new(-1.0, 1.0, -1.0),
            Point::new(-1.0, -1.0, 1.0),
        ];
        let faces: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
        Self::from_tables(vertices, &faces)
    }

    /// 8 vertices (every sign combination of `(±1, ±1, ±1)`), 6 quads
    pub fn hexahedron() -> Self {
        let mut vertices = Vec::with_capacity(8);
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                for z in [-1.0, 1.0] {
                    vertices.push(Point::new(x, y, z));
                }
            }
        }
        let faces: [[usize; 4]; 6] = [
            [0, 1, 3, 2], // x = -1
            [4, 5, 7, 6], // x = +1
            [0, 1, 5, 4], // y = -1
            [2, 3, 7, 6], // y = +1
            [0, 2, 6, 4], // z = -1
            [1, 3, 7, 5], // z = +1
        ];
        Self::from_tables(vertices, &faces)
    }

    /// 6 vertices on the unit axes, 8 triangles
    pub fn octahedron() -> Self {
        let vertices = vec![
            Point::new(1.0, 0.0, 0.0),
            Point::new(-1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, -1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
            Point::new(0.0, 0.0, -1.0),
        ];
        let faces: [[usize; 3]; 8] = [
            [0, 2, 4],
            [0, 4, 3],
            [0, 3, 5],
            [0, 5, 2],
            [1, 2, 5],
            [1, 5, 3],
            [1, 3, 4],
            [1, 4, 2],
        ];
        Self::from_tables(vertices, &faces)
    }

    /// 12 vertices on the unit sphere, 20 triangles
    pub fn icosahedron() -> Self {
        let t = PHI;
        let vertices = normalized(&[
            (-1.0, t, 0.0),
            (1.0, t, 0.0),
            (-1.0, -t, 0.0),
            (1.0, -t, 0.0),
            (0.0, -1.0, t),
            (0.0, 1.0, t),
            (0.0, -1.0, -t),
            (0.0, 1.0, -t),
            (t, 0.0, -1.0),
            (t, 0.0, 1.0),
            (-t, 0.0, -1.0),
            (-t, 0.0, 1.0),
        ]);
        let faces: [[usize; 3]; 20] = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];
        Self::from_tables(vertices, &faces)
    }

    /// 20 vertices on the unit sphere, 12 pentagons
    pub fn dodecahedron() -> Self {
        let (a, b) = (1.0 / PHI, PHI);
        let vertices = normalized(&[
            // (±1, ±1, ±1)
            (1.0, 1.0, 1.0),
            (1.0, 1.0, -1.0),
            (1.0, -1.0, 1.0),
            (1.0, -1.0, -1.0),
            (-1.0, 1.0, 1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, -1.0, 1.0),
            (-1.0, -1.0, -1.0),
            // (0, ±1/φ, ±φ)
            (0.0, a, b),
            (0.0, a, -b),
            (0.0, -a, b),
            (0.0, -a, -b),
            // (±1/φ, ±φ, 0)
            (a, b, 0.0),
            (a, -b, 0.0),
            (-a, b, 0.0),
            (-a, -b, 0.0),
            // (±φ, 0, ±1/φ)
            (b, 0.0, a),
            (b, 0.0, -a),
            (-b, 0.0, a),
            (-b, 0.0, -a),
        ]);
        let faces: [[usize; 5]; 12] = [
            [4, 8, 0, 12, 14],
            [2, 16, 0, 8, 10],
            [1, 12, 0, 16, 17],
            [14, 12, 1, 9, 5],
            [10, 8, 4, 18, 6],
            [17, 16, 2, 13, 3],
            [15, 13, 2, 10, 6],
            [11, 9, 1, 17, 3],
            [19, 18, 4, 14, 5],
            [7, 11, 3, 13, 15],
            [7, 19, 5, 9, 11],
            [7, 15, 6, 18, 19],
        ];
        Self::from_tables(vertices, &faces)
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Polygon] {
        &self.faces
    }

    /// Arithmetic mean of the vertices; the origin for an empty mesh.
    pub fn centroid(&self) -> Point {
        self.center
    }

    /// Transform every vertex and every face's point copies by `matrix`,
    /// then recompute the centroid.
    ///
    /// All-or-nothing: if any point hits a zero homogeneous w the mesh is
    /// left exactly as it was.
    pub fn apply_transform(&mut self, matrix: &Matrix4<f64>) -> Result<()> {
        let mut vertices = self.vertices.clone();
        for vertex in &mut vertices {
            vertex.transform(matrix)?;
        }
        let mut faces = self.faces.clone();
        for face in &mut faces {
            for point in face.points_mut() {
                point.transform(matrix)?;
            }
        }

        self.vertices = vertices;
        self.faces = faces;
        self.center = centroid_of(&self.vertices);
        debug!(center = %self.center, "transform applied to polyhedron");
        Ok(())
    }

    pub fn vertex_list(&self) -> Vec<(f64, f64, f64)> {
        self.vertices.iter().map(|v| (v.x(), v.y(), v.z())).collect()
    }

    /// Per-face indices into that face's own point list.
    pub fn face_vertex_indices(&self) -> Vec<Vec<usize>> {
        self.faces.iter().map(|face| (0..face.len()).collect()).collect()
    }
}

impl fmt::Display for Polyhedron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Polyhedron({} vertices, {} faces)",
            self.vertices.len(),
            self.faces.len()
        )
    }
}

fn centroid_of(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::origin();
    }
    let sum = points
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.position.coords);
    Point::from(Point3::from(sum / points.len() as f64))
}

fn normalized(coords: &[(f64, f64, f64)]) -> Vec<Point> {
    coords
        .iter()
        .map(|&(x, y, z)| {
            let p = Point3::new(x, y, z);
            Point::from(Point3::from(p.coords.normalize()))
        })
        .collect()
}

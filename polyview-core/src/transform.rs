//! 4x4 homogeneous transformation matrices
//!
//! Every builder returns a `Matrix4<f64>` acting on column vectors,
//! `p' = M * p`. Angles are given in degrees.
use nalgebra::{Matrix4, Unit, Vector3};
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::Point;
use crate::polyhedron::Polyhedron;

/// Number of incremental steps baked into a spiral transform
pub const SPIRAL_STEPS: usize = 10;

/// Coordinate plane used as a mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl FromStr for Plane {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "XY" => Ok(Plane::XY),
            "XZ" => Ok(Plane::XZ),
            "YZ" => Ok(Plane::YZ),
            _ => Err(GeometryError::UnknownPlane(s.to_string())),
        }
    }
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

impl FromStr for Axis {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            _ => Err(GeometryError::UnknownAxis(s.to_string())),
        }
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4<f64> {
        Matrix4::identity()
    }

    /// Create a translation matrix
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(dx, dy, dz))
    }

    /// Create a scale matrix
    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    pub fn rotation_x(angle_degrees: f64) -> Matrix4<f64> {
        let (s, c) = angle_degrees.to_radians().sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        m
    }

    pub fn rotation_y(angle_degrees: f64) -> Matrix4<f64> {
        let (s, c) = angle_degrees.to_radians().sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        m
    }

    pub fn rotation_z(angle_degrees: f64) -> Matrix4<f64> {
        let (s, c) = angle_degrees.to_radians().sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        m
    }

    /// Mirror across a coordinate plane by negating the orthogonal axis.
    pub fn reflection(plane: Plane) -> Matrix4<f64> {
        match plane {
            Plane::XY => Self::scaling(1.0, 1.0, -1.0),
            Plane::XZ => Self::scaling(1.0, -1.0, 1.0),
            Plane::YZ => Self::scaling(-1.0, 1.0, 1.0),
        }
    }

    /// Shear where `x += xy*y + xz*z`, `y += yx*x + yz*z`, `z += zx*x + zy*y`.
    pub fn shearing(xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        m[(0, 1)] = xy;
        m[(0, 2)] = xz;
        m[(1, 0)] = yx;
        m[(1, 2)] = yz;
        m[(2, 0)] = zx;
        m[(2, 1)] = zy;
        m
    }

    /// Rotation about the line through `point` along `direction`.
    ///
    /// Built as `T(point) * R * T(-point)` with `R` from Rodrigues' formula
    /// over the normalized direction.
    pub fn rotation_around_line(
        point: &Point,
        direction: &Vector3<f64>,
        angle_degrees: f64,
    ) -> Result<Matrix4<f64>> {
        let axis = Unit::try_new(*direction, 0.0).ok_or(GeometryError::ZeroLengthDirection)?;
        let (u, v, w) = (axis.x, axis.y, axis.z);
        let (s, c) = angle_degrees.to_radians().sin_cos();
        let t = 1.0 - c;

        let mut rotation = Matrix4::<f64>::identity();
        rotation[(0, 0)] = c + u * u * t;
        rotation[(0, 1)] = u * v * t - w * s;
        rotation[(0, 2)] = u * w * t + v * s;
        rotation[(1, 0)] = u * v * t + w * s;
        rotation[(1, 1)] = c + v * v * t;
        rotation[(1, 2)] = v * w * t - u * s;
        rotation[(2, 0)] = u * w * t - v * s;
        rotation[(2, 1)] = v * w * t + u * s;
        rotation[(2, 2)] = c + w * w * t;

        debug!(%point, ?axis, angle_degrees, "rotation around line");

        let to_origin = Self::translation(-point.x(), -point.y(), -point.z());
        let back = Self::translation(point.x(), point.y(), point.z());
        Ok(back * rotation * to_origin)
    }

    /// Rotation about the axis running from `p1` to `p2`.
    pub fn rotation_around_axis(p1: &Point, p2: &Point, angle_degrees: f64) -> Result<Matrix4<f64>> {
        if p1 == p2 {
            return Err(GeometryError::CoincidentAxisPoints);
        }
        let direction = p2.position - p1.position;
        Self::rotation_around_line(p1, &direction, angle_degrees)
    }

    /// Rotation about an axis parallel to `axis` through the polyhedron's centroid.
    pub fn rotation_around_center_axis(
        polyhedron: &Polyhedron,
        axis: Axis,
        angle_degrees: f64,
    ) -> Result<Matrix4<f64>> {
        Self::rotation_around_line(&polyhedron.centroid(), &axis.unit(), angle_degrees)
    }

    /// `T(point) * S(sx, sy, sz) * T(-point)`
    pub fn scaling_around_point(point: &Point, sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
        let to_origin = Self::translation(-point.x(), -point.y(), -point.z());
        let back = Self::translation(point.x(), point.y(), point.z());
        back * Self::scaling(sx, sy, sz) * to_origin
    }

    pub fn scaling_around_center(polyhedron: &Polyhedron, sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
        Self::scaling_around_point(&polyhedron.centroid(), sx, sy, sz)
    }

    /// Compose matrices so that they take effect in the order listed.
    ///
    /// `composite(&[m1, m2, m3])` is `m3 * m2 * m1`: a point is first moved
    /// by `m1`, then `m2`, then `m3`. An empty slice yields the identity.
    pub fn composite(matrices: &[Matrix4<f64>]) -> Matrix4<f64> {
        matrices
            .iter()
            .fold(Matrix4::identity(), |acc, m| m * acc)
    }

    /// A helical sweep collapsed into one matrix.
    ///
    /// Moves `center` to the origin, then for each of the ten steps rotates
    /// about Y by `rotations * 36 * step` degrees and lifts along Z by
    /// `height / 10 * step`, scales uniformly by `scale_factor` and moves back.
    pub fn spiral(center: &Point, height: f64, rotations: f64, scale_factor: f64) -> Matrix4<f64> {
        let angle_per_step = rotations * 360.0 / SPIRAL_STEPS as f64;
        let height_per_step = height / SPIRAL_STEPS as f64;

        let mut matrices = Vec::with_capacity(2 * SPIRAL_STEPS + 3);
        matrices.push(Self::translation(-center.x(), -center.y(), -center.z()));
        for step in 1..=SPIRAL_STEPS {
            let step = step as f64;
            matrices.push(Self::rotation_y(angle_per_step * step));
            matrices.push(Self::translation(0.0, 0.0, height_per_step * step));
        }
        matrices.push(Self::scaling(scale_factor, scale_factor, scale_factor));
        matrices.push(Self::translation(center.x(), center.y(), center.z()));

        debug!(%center, height, rotations, scale_factor, "spiral transform");
        Self::composite(&matrices)
    }

    /// Perspective matrix with the eye at distance `d`: copies `z / d` into `w`.
    pub fn perspective(d: f64) -> Result<Matrix4<f64>> {
        if d == 0.0 {
            return Err(GeometryError::ZeroEyeDistance);
        }
        let mut m = Matrix4::identity();
        m[(3, 2)] = 1.0 / d;
        m[(3, 3)] = 0.0;
        Ok(m)
    }

    /// Orthographic matrix flattening onto the XY plane.
    pub fn orthographic() -> Matrix4<f64> {
        Self::scaling(1.0, 1.0, 0.0)
    }

    /// Transform independent copies of `points`.
    pub fn apply_to_points(points: &[Point], matrix: &Matrix4<f64>) -> Result<Vec<Point>> {
        points.iter().map(|p| p.transformed(matrix)).collect()
    }

    /// Flat row-major layout of the 16 entries.
    pub fn to_row_major(matrix: &Matrix4<f64>) -> [f64; 16] {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = matrix[(row, col)];
            }
        }
        out
    }

    /// Fixed-width dump of a matrix, one row per line.
    pub fn format(matrix: &Matrix4<f64>, name: &str) -> String {
        let mut out = format!("{name}:\n");
        for row in 0..4 {
            let cells: Vec<String> = (0..4).map(|col| format!("{:8.3}", matrix[(row, col)])).collect();
            let sep = if row == 3 { "" } else { "," };
            let _ = writeln!(out, "[{}]{}", cells.join(", "), sep);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::Point3;

    const EPS: f64 = 1e-9;

    fn apply(m: &Matrix4<f64>, p: Point) -> Point3<f64> {
        p.transformed(m).unwrap().position
    }

    fn assert_orthogonal(m: &Matrix4<f64>) {
        assert_abs_diff_eq!(m.transpose() * m, Matrix4::identity(), epsilon = EPS);
    }

    #[test]
    fn test_translation_of_origin() {
        let m = Transform::translation(1.5, -2.0, 3.0);
        assert_eq!(apply(&m, Point::origin()), Point3::new(1.5, -2.0, 3.0));
    }

    #[test]
    fn test_scaling_diagonal() {
        let m = Transform::scaling(2.0, 3.0, 4.0);
        assert_eq!(m, Matrix4::from_diagonal(&nalgebra::Vector4::new(2.0, 3.0, 4.0, 1.0)));
    }

    #[test]
    fn test_rotations_fix_origin() {
        for angle in [0.0, 30.0, 90.0, 217.5] {
            for m in [
                Transform::rotation_x(angle),
                Transform::rotation_y(angle),
                Transform::rotation_z(angle),
            ] {
                assert_abs_diff_eq!(apply(&m, Point::origin()), Point3::origin(), epsilon = EPS);
            }
        }
    }

    #[test]
    fn test_rotations_are_orthogonal() {
        for angle in [15.0, 45.0, 123.0, -270.0] {
            assert_orthogonal(&Transform::rotation_x(angle));
            assert_orthogonal(&Transform::rotation_y(angle));
            assert_orthogonal(&Transform::rotation_z(angle));
            let line = Transform::rotation_around_line(
                &Point::origin(),
                &Vector3::new(1.0, 2.0, -0.5),
                angle,
            )
            .unwrap();
            assert_orthogonal(&line);
        }
    }

    #[test]
    fn test_right_hand_rule() {
        let y = Point::new(0.0, 1.0, 0.0);
        assert_abs_diff_eq!(
            apply(&Transform::rotation_x(90.0), y),
            Point3::new(0.0, 0.0, 1.0),
            epsilon = EPS
        );
        let z = Point::new(0.0, 0.0, 1.0);
        assert_abs_diff_eq!(
            apply(&Transform::rotation_y(90.0), z),
            Point3::new(1.0, 0.0, 0.0),
            epsilon = EPS
        );
        let x = Point::new(1.0, 0.0, 0.0);
        assert_abs_diff_eq!(
            apply(&Transform::rotation_z(90.0), x),
            Point3::new(0.0, 1.0, 0.0),
            epsilon = EPS
        );
    }

    #[test]
    fn test_reflection_planes() {
        let p = Point::new(1.0, 2.0, 3.0);
        assert_eq!(apply(&Transform::reflection(Plane::XY), p), Point3::new(1.0, 2.0, -3.0));
        assert_eq!(apply(&Transform::reflection(Plane::XZ), p), Point3::new(1.0, -2.0, 3.0));
        assert_eq!(apply(&Transform::reflection(Plane::YZ), p), Point3::new(-1.0, 2.0, 3.0));
    }

    #[test]
    fn test_plane_and_axis_tokens() {
        assert_eq!("xz".parse::<Plane>(), Ok(Plane::XZ));
        assert_eq!(
            "XW".parse::<Plane>(),
            Err(GeometryError::UnknownPlane("XW".to_string()))
        );
        assert_eq!("y".parse::<Axis>(), Ok(Axis::Y));
        assert_eq!("W".parse::<Axis>(), Err(GeometryError::UnknownAxis("W".to_string())));
    }

    #[test]
    fn test_shearing_coupling() {
        let m = Transform::shearing(0.3, 0.0, 0.0, 0.2, 0.0, 0.0);
        let p = apply(&m, Point::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3::new(1.3, 1.2, 1.0), epsilon = EPS);

        let m = Transform::shearing(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let p = apply(&m, Point::new(1.0, 10.0, 100.0));
        assert_relative_eq!(p, Point3::new(211.0, 413.0, 165.0), epsilon = EPS);
    }

    #[test]
    fn test_zero_direction_rejected() {
        let result = Transform::rotation_around_line(&Point::origin(), &Vector3::zeros(), 45.0);
        assert_eq!(result, Err(GeometryError::ZeroLengthDirection));
    }

    #[test]
    fn test_coincident_axis_points_rejected() {
        let p = Point::new(1.0, 1.0, 1.0);
        assert_eq!(
            Transform::rotation_around_axis(&p, &p, 30.0),
            Err(GeometryError::CoincidentAxisPoints)
        );
    }

    #[test]
    fn test_line_rotation_matches_axis_rotation() {
        let line = Transform::rotation_around_line(&Point::origin(), &Vector3::new(0.0, 0.0, 3.0), 37.0)
            .unwrap();
        assert_abs_diff_eq!(line, Transform::rotation_z(37.0), epsilon = EPS);
    }

    #[test]
    fn test_line_rotation_keeps_axis_points_fixed() {
        let p1 = Point::new(-1.0, -1.0, -1.0);
        let p2 = Point::new(1.0, 1.0, 1.0);
        let m = Transform::rotation_around_axis(&p1, &p2, 30.0).unwrap();
        assert_abs_diff_eq!(apply(&m, p1), p1.position, epsilon = EPS);
        assert_abs_diff_eq!(apply(&m, p2), p2.position, epsilon = EPS);
        assert_abs_diff_eq!(apply(&m, Point::origin()), Point3::origin(), epsilon = EPS);
    }

    #[test]
    fn test_offset_line_rotation() {
        // Axis parallel to Z through (1, 0, 0): the origin swings to (1, -1, 0).
        let m = Transform::rotation_around_line(&Point::new(1.0, 0.0, 0.0), &Vector3::z(), 90.0).unwrap();
        assert_abs_diff_eq!(apply(&m, Point::origin()), Point3::new(1.0, -1.0, 0.0), epsilon = EPS);
    }

    #[test]
    fn test_axis_rotation_inverse_angle() {
        let p1 = Point::new(0.5, -2.0, 1.0);
        let p2 = Point::new(3.0, 1.0, -1.0);
        let forward = Transform::rotation_around_axis(&p1, &p2, 73.0).unwrap();
        let backward = Transform::rotation_around_axis(&p1, &p2, -73.0).unwrap();
        let p = Point::new(4.0, 5.0, 6.0);
        let moved = p.transformed(&forward).unwrap();
        let restored = moved.transformed(&backward).unwrap();
        assert_abs_diff_eq!(restored.position, p.position, epsilon = EPS);
    }

    #[test]
    fn test_center_axis_rotation_far_from_origin() {
        let far = Polyhedron::new(vec![Point::new(1e17, 0.0, 0.0)], &[]).unwrap();
        // centroid + unit rounds back to the centroid at this magnitude
        let m = Transform::rotation_around_center_axis(&far, Axis::Z, 30.0).unwrap();
        assert_abs_diff_eq!(
            m.fixed_view::<3, 3>(0, 0).into_owned(),
            Transform::rotation_z(30.0).fixed_view::<3, 3>(0, 0).into_owned(),
            epsilon = EPS
        );
    }

    #[test]
    fn test_center_axis_rotation_keeps_centroid() {
        let cube = Polyhedron::hexahedron();
        let mut moved = cube.clone();
        moved.apply_transform(&Transform::translation(2.0, -3.0, 1.0)).unwrap();
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let m = Transform::rotation_around_center_axis(&moved, axis, 45.0).unwrap();
            assert_abs_diff_eq!(
                apply(&m, moved.centroid()),
                Point3::new(2.0, -3.0, 1.0),
                epsilon = EPS
            );
        }
    }

    #[test]
    fn test_scaling_around_point_fixes_point() {
        let pivot = Point::new(3.0, -1.0, 2.5);
        for s in [0.1, 0.7, 1.5, -2.0] {
            let m = Transform::scaling_around_point(&pivot, s, s, s);
            assert_abs_diff_eq!(apply(&m, pivot), pivot.position, epsilon = EPS);
        }
    }

    #[test]
    fn test_composite_applies_in_listed_order() {
        let scale_then_translate =
            Transform::composite(&[Transform::scaling(2.0, 2.0, 2.0), Transform::translation(1.0, 0.0, 0.0)]);
        assert_eq!(apply(&scale_then_translate, Point::origin()), Point3::new(1.0, 0.0, 0.0));

        let translate_then_scale =
            Transform::composite(&[Transform::translation(1.0, 0.0, 0.0), Transform::scaling(2.0, 2.0, 2.0)]);
        assert_eq!(apply(&translate_then_scale, Point::origin()), Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_composite_of_nothing_is_identity() {
        assert_eq!(Transform::composite(&[]), Matrix4::identity());
    }

    #[test]
    fn test_spiral_zero_motion_is_identity() {
        let m = Transform::spiral(&Point::new(1.0, 2.0, 3.0), 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(m, Matrix4::identity(), epsilon = EPS);
    }

    #[test]
    fn test_spiral_matches_explicit_sequence() {
        let center = Point::new(0.5, 0.0, -1.0);
        let (height, rotations, scale) = (2.0, 0.5, 1.2);
        let mut expected = Transform::translation(-0.5, 0.0, 1.0);
        for step in 1..=10 {
            let step = step as f64;
            expected = Transform::rotation_y(18.0 * step) * expected;
            expected = Transform::translation(0.0, 0.0, 0.2 * step) * expected;
        }
        expected = Transform::scaling(scale, scale, scale) * expected;
        expected = Transform::translation(0.5, 0.0, -1.0) * expected;

        let spiral = Transform::spiral(&center, height, rotations, scale);
        assert_abs_diff_eq!(spiral, expected, epsilon = EPS);
    }

    #[test]
    fn test_spiral_without_rotation_only_lifts() {
        let m = Transform::spiral(&Point::origin(), 1.0, 0.0, 1.0);
        // 0.1 * (1 + ... + 10)
        assert_abs_diff_eq!(apply(&m, Point::origin()), Point3::new(0.0, 0.0, 5.5), epsilon = EPS);
    }

    #[test]
    fn test_perspective_matrix_divides_by_depth() {
        let m = Transform::perspective(5.0).unwrap();
        let p = apply(&m, Point::new(1.0, 2.0, 10.0));
        assert_relative_eq!(p, Point3::new(0.5, 1.0, 5.0), epsilon = EPS);

        let degenerate = Point::new(1.0, 1.0, 0.0).transformed(&m);
        assert_eq!(degenerate, Err(GeometryError::DegenerateHomogeneousDivide));
        assert_eq!(Transform::perspective(0.0), Err(GeometryError::ZeroEyeDistance));
    }

    #[test]
    fn test_orthographic_drops_depth() {
        let p = apply(&Transform::orthographic(), Point::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_row_major_layout() {
        let flat = Transform::to_row_major(&Transform::translation(7.0, 8.0, 9.0));
        assert_eq!(flat[3], 7.0);
        assert_eq!(flat[7], 8.0);
        assert_eq!(flat[11], 9.0);
        assert_eq!(flat[15], 1.0);
        assert_eq!(flat[12], 0.0);
    }

    #[test]
    fn test_apply_to_points_copies() {
        let points = vec![Point::origin(), Point::new(1.0, 1.0, 1.0)];
        let moved = Transform::apply_to_points(&points, &Transform::translation(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(points[0], Point::origin());
        assert_eq!(moved[1], Point::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_format_rows() {
        let text = Transform::format(&Transform::identity(), "Identity");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Identity:");
        assert_eq!(lines[1], "[   1.000,    0.000,    0.000,    0.000],");
        assert_eq!(lines[4], "[   0.000,    0.000,    0.000,    1.000]");
    }
}

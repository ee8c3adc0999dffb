//! Discrete user actions and their textual form
//!
//! One action per line:
//!
//! ```text
//! solid cube
//! projection perspective
//! rotate-x 90
//! rotate-axis -1,-1,-1 1,1,1 30
//! composite rotate-x 25; rotate-y 15; scale 1.1 0.9 1.1
//! preset spiral
//! ```
use nalgebra::{Matrix4, Vector3};
use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0, space1},
    combinator::{all_consuming, cut, map, map_res, peek, value, verify},
    error::{ErrorKind, FromExternalError, ParseError},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};
use std::fmt;
use std::str::FromStr;

use crate::error::{ActionError, Result};
use crate::geometry::Point;
use crate::polyhedron::{Polyhedron, SolidKind};
use crate::projection::ProjectionMode;
use crate::transform::{Axis, Plane, Transform};

/// A parameterised transformation request
#[derive(Debug, Clone, PartialEq)]
pub enum TransformKind {
    Translate { dx: f64, dy: f64, dz: f64 },
    Scale { sx: f64, sy: f64, sz: f64 },
    RotateX(f64),
    RotateY(f64),
    RotateZ(f64),
    Reflect(Plane),
    /// Coefficients in the order `xy, xz, yx, yz, zx, zy`
    Shear([f64; 6]),
    RotateLine {
        point: Point,
        direction: Vector3<f64>,
        angle: f64,
    },
    RotateAxis { p1: Point, p2: Point, angle: f64 },
    RotateCenter { axis: Axis, angle: f64 },
    ScaleCenter { sx: f64, sy: f64, sz: f64 },
    /// Spiral anchored at the polyhedron's centroid
    Spiral {
        height: f64,
        rotations: f64,
        scale: f64,
    },
    /// Parts take effect in the order listed
    Composite(Vec<TransformKind>),
}

impl TransformKind {
    /// Build the matrix for this request against the current polyhedron.
    ///
    /// Centroid-relative parts of a composite all use the centroid as it is
    /// before the composite is applied.
    pub fn matrix(&self, polyhedron: &Polyhedron) -> Result<Matrix4<f64>> {
        match self {
            TransformKind::Translate { dx, dy, dz } => Ok(Transform::translation(*dx, *dy, *dz)),
            TransformKind::Scale { sx, sy, sz } => Ok(Transform::scaling(*sx, *sy, *sz)),
            TransformKind::RotateX(angle) => Ok(Transform::rotation_x(*angle)),
            TransformKind::RotateY(angle) => Ok(Transform::rotation_y(*angle)),
            TransformKind::RotateZ(angle) => Ok(Transform::rotation_z(*angle)),
            TransformKind::Reflect(plane) => Ok(Transform::reflection(*plane)),
            TransformKind::Shear([xy, xz, yx, yz, zx, zy]) => {
                Ok(Transform::shearing(*xy, *xz, *yx, *yz, *zx, *zy))
            }
            TransformKind::RotateLine {
                point,
                direction,
                angle,
            } => Transform::rotation_around_line(point, direction, *angle),
            TransformKind::RotateAxis { p1, p2, angle } => {
                Transform::rotation_around_axis(p1, p2, *angle)
            }
            TransformKind::RotateCenter { axis, angle } => {
                Transform::rotation_around_center_axis(polyhedron, *axis, *angle)
            }
            TransformKind::ScaleCenter { sx, sy, sz } => {
                Ok(Transform::scaling_around_center(polyhedron, *sx, *sy, *sz))
            }
            TransformKind::Spiral {
                height,
                rotations,
                scale,
            } => Ok(Transform::spiral(
                &polyhedron.centroid(),
                *height,
                *rotations,
                *scale,
            )),
            TransformKind::Composite(parts) => {
                let matrices = parts
                    .iter()
                    .map(|part| part.matrix(polyhedron))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Transform::composite(&matrices))
            }
        }
    }
}

fn write_vec(f: &mut fmt::Formatter<'_>, x: f64, y: f64, z: f64) -> fmt::Result {
    write!(f, "{x},{y},{z}")
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformKind::Translate { dx, dy, dz } => write!(f, "translate {dx} {dy} {dz}"),
            TransformKind::Scale { sx, sy, sz } => write!(f, "scale {sx} {sy} {sz}"),
            TransformKind::RotateX(angle) => write!(f, "rotate-x {angle}"),
            TransformKind::RotateY(angle) => write!(f, "rotate-y {angle}"),
            TransformKind::RotateZ(angle) => write!(f, "rotate-z {angle}"),
            TransformKind::Reflect(plane) => write!(f, "reflect {plane:?}"),
            TransformKind::Shear(c) => write!(
                f,
                "shear {} {} {} {} {} {}",
                c[0], c[1], c[2], c[3], c[4], c[5]
            ),
            TransformKind::RotateLine {
                point,
                direction,
                angle,
            } => {
                write!(f, "rotate-line ")?;
                write_vec(f, point.x(), point.y(), point.z())?;
                write!(f, " ")?;
                write_vec(f, direction.x, direction.y, direction.z)?;
                write!(f, " {angle}")
            }
            TransformKind::RotateAxis { p1, p2, angle } => {
                write!(f, "rotate-axis ")?;
                write_vec(f, p1.x(), p1.y(), p1.z())?;
                write!(f, " ")?;
                write_vec(f, p2.x(), p2.y(), p2.z())?;
                write!(f, " {angle}")
            }
            TransformKind::RotateCenter { axis, angle } => {
                write!(f, "rotate-center {axis:?} {angle}")
            }
            TransformKind::ScaleCenter { sx, sy, sz } => write!(f, "scale-center {sx} {sy} {sz}"),
            TransformKind::Spiral {
                height,
                rotations,
                scale,
            } => write!(f, "spiral {height} {rotations} {scale}"),
            TransformKind::Composite(parts) => {
                write!(f, "composite ")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

/// The fixed transforms bound to the viewer's letter keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    ScaleUp,
    ScaleDown,
    RotateCenterX,
    RotateCenterY,
    RotateCenterZ,
    ArbitraryAxis,
    ReflectXY,
    Composite,
    Shear,
    LineRotation,
    Spiral,
}

impl Preset {
    pub const ALL: [Preset; 11] = [
        Preset::ScaleUp,
        Preset::ScaleDown,
        Preset::RotateCenterX,
        Preset::RotateCenterY,
        Preset::RotateCenterZ,
        Preset::ArbitraryAxis,
        Preset::ReflectXY,
        Preset::Composite,
        Preset::Shear,
        Preset::LineRotation,
        Preset::Spiral,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::ScaleUp => "scale-up",
            Preset::ScaleDown => "scale-down",
            Preset::RotateCenterX => "rotate-center-x",
            Preset::RotateCenterY => "rotate-center-y",
            Preset::RotateCenterZ => "rotate-center-z",
            Preset::ArbitraryAxis => "arbitrary-axis",
            Preset::ReflectXY => "reflect-xy",
            Preset::Composite => "composite",
            Preset::Shear => "shear",
            Preset::LineRotation => "line-rotation",
            Preset::Spiral => "spiral",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::ScaleUp => "Scaling around center 1.5x",
            Preset::ScaleDown => "Scaling around center 0.7x",
            Preset::RotateCenterX => "Rotation around X axis through center",
            Preset::RotateCenterY => "Rotation around Y axis through center",
            Preset::RotateCenterZ => "Rotation around Z axis through center",
            Preset::ArbitraryAxis => "Rotation around arbitrary axis",
            Preset::ReflectXY => "Reflection across XY plane",
            Preset::Composite => "Composite transformation",
            Preset::Shear => "Shearing transformation",
            Preset::LineRotation => "Rotation around arbitrary line",
            Preset::Spiral => "Spiral transformation",
        }
    }

    pub fn transform(self) -> TransformKind {
        match self {
            Preset::ScaleUp => TransformKind::ScaleCenter {
                sx: 1.5,
                sy: 1.5,
                sz: 1.5,
            },
            Preset::ScaleDown => TransformKind::ScaleCenter {
                sx: 0.7,
                sy: 0.7,
                sz: 0.7,
            },
            Preset::RotateCenterX => TransformKind::RotateCenter {
                axis: Axis::X,
                angle: 45.0,
            },
            Preset::RotateCenterY => TransformKind::RotateCenter {
                axis: Axis::Y,
                angle: 45.0,
            },
            Preset::RotateCenterZ => TransformKind::RotateCenter {
                axis: Axis::Z,
                angle: 45.0,
            },
            Preset::ArbitraryAxis => TransformKind::RotateAxis {
                p1: Point::new(-1.0, -1.0, -1.0),
                p2: Point::new(1.0, 1.0, 1.0),
                angle: 30.0,
            },
            Preset::ReflectXY => TransformKind::Reflect(Plane::XY),
            Preset::Composite => TransformKind::Composite(vec![
                TransformKind::RotateX(25.0),
                TransformKind::RotateY(15.0),
                TransformKind::Scale {
                    sx: 1.1,
                    sy: 0.9,
                    sz: 1.1,
                },
            ]),
            Preset::Shear => TransformKind::Shear([0.3, 0.0, 0.0, 0.2, 0.0, 0.0]),
            Preset::LineRotation => TransformKind::RotateLine {
                point: Point::origin(),
                direction: Vector3::new(1.0, 1.0, 0.0),
                angle: 45.0,
            },
            Preset::Spiral => TransformKind::Spiral {
                height: 2.0,
                rotations: 0.5,
                scale: 1.2,
            },
        }
    }
}

impl FromStr for Preset {
    type Err = ActionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == lower)
            .ok_or_else(|| ActionError::UnknownPreset(s.to_string()))
    }
}

/// A request delivered by an input source
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SwitchSolid(SolidKind),
    SwitchProjection(ProjectionMode),
    Apply(TransformKind),
    Reset,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SwitchSolid(kind) => write!(f, "solid {kind:?}"),
            Action::SwitchProjection(mode) => write!(f, "projection {mode}"),
            Action::Apply(kind) => write!(f, "{kind}"),
            Action::Reset => f.write_str("reset"),
            Action::Quit => f.write_str("quit"),
        }
    }
}

/// nom error that keeps domain failures (unknown plane, solid, ...) intact
#[derive(Debug)]
struct ActionParseError {
    cause: Option<ActionError>,
}

impl<'a> ParseError<&'a str> for ActionParseError {
    fn from_error_kind(_input: &'a str, _kind: ErrorKind) -> Self {
        Self { cause: None }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a, E: Into<ActionError>> FromExternalError<&'a str, E> for ActionParseError {
    fn from_external_error(_input: &'a str, _kind: ErrorKind, e: E) -> Self {
        Self {
            cause: Some(e.into()),
        }
    }
}

type PResult<'a, T> = IResult<&'a str, T, ActionParseError>;

fn word(input: &str) -> PResult<'_, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')(input)
}

fn arg_word(input: &str) -> PResult<'_, &str> {
    preceded(space1, word)(input)
}

/// A float literal; `nan` and `inf` are rejected.
fn finite(input: &str) -> PResult<'_, f64> {
    verify(double, |v: &f64| v.is_finite())(input)
}

fn number(input: &str) -> PResult<'_, f64> {
    preceded(space1, finite)(input)
}

fn comma(input: &str) -> PResult<'_, char> {
    delimited(space0, char(','), space0)(input)
}

fn vec3(input: &str) -> PResult<'_, Vector3<f64>> {
    map(
        preceded(
            space1,
            tuple((finite, preceded(comma, finite), preceded(comma, finite))),
        ),
        |(x, y, z)| Vector3::new(x, y, z),
    )(input)
}

fn point(input: &str) -> PResult<'_, Point> {
    map(vec3, |v| Point::new(v.x, v.y, v.z))(input)
}

fn triple(input: &str) -> PResult<'_, (f64, f64, f64)> {
    tuple((number, number, number))(input)
}

fn transform(input: &str) -> PResult<'_, TransformKind> {
    let (rest, keyword) = word(input)?;
    match keyword.to_ascii_lowercase().as_str() {
        "translate" | "move" => map(triple, |(dx, dy, dz)| TransformKind::Translate { dx, dy, dz })(rest),
        "scale" => map(triple, |(sx, sy, sz)| TransformKind::Scale { sx, sy, sz })(rest),
        "rotate-x" => map(number, TransformKind::RotateX)(rest),
        "rotate-y" => map(number, TransformKind::RotateY)(rest),
        "rotate-z" => map(number, TransformKind::RotateZ)(rest),
        "reflect" => map(cut(map_res(arg_word, str::parse::<Plane>)), TransformKind::Reflect)(rest),
        "shear" => map(tuple((triple, triple)), |((a, b, c), (d, e, g))| {
            TransformKind::Shear([a, b, c, d, e, g])
        })(rest),
        "rotate-line" => map(tuple((point, vec3, number)), |(point, direction, angle)| {
            TransformKind::RotateLine {
                point,
                direction,
                angle,
            }
        })(rest),
        "rotate-axis" => map(tuple((point, point, number)), |(p1, p2, angle)| {
            TransformKind::RotateAxis { p1, p2, angle }
        })(rest),
        "rotate-center" => map(
            tuple((cut(map_res(arg_word, str::parse::<Axis>)), number)),
            |(axis, angle)| TransformKind::RotateCenter { axis, angle },
        )(rest),
        "scale-center" => map(triple, |(sx, sy, sz)| TransformKind::ScaleCenter { sx, sy, sz })(rest),
        "spiral" => map(triple, |(height, rotations, scale)| TransformKind::Spiral {
            height,
            rotations,
            scale,
        })(rest),
        "composite" => map(
            preceded(
                space1,
                separated_list1(delimited(space0, char(';'), space0), transform),
            ),
            TransformKind::Composite,
        )(rest),
        "preset" => map(cut(map_res(arg_word, str::parse::<Preset>)), Preset::transform)(rest),
        _ => Err(nom::Err::Error(ActionParseError::from_error_kind(
            input,
            ErrorKind::Tag,
        ))),
    }
}

fn action(input: &str) -> PResult<'_, Action> {
    let (_, keyword) = peek(word)(input)?;
    match keyword.to_ascii_lowercase().as_str() {
        "solid" => map(
            preceded(word, cut(map_res(arg_word, str::parse::<SolidKind>))),
            Action::SwitchSolid,
        )(input),
        "projection" => map(
            preceded(word, cut(map_res(arg_word, str::parse::<ProjectionMode>))),
            Action::SwitchProjection,
        )(input),
        "reset" => value(Action::Reset, word)(input),
        "quit" | "exit" => value(Action::Quit, word)(input),
        _ => map(transform, Action::Apply)(input),
    }
}

fn parse_line(line: &str, line_number: usize) -> std::result::Result<Action, ActionError> {
    let body = strip_comment(line);
    let parsed = all_consuming(terminated(preceded(space0, action), space0))(body);
    match parsed {
        Ok((_, action)) => Ok(action),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(e.cause.unwrap_or_else(|| ActionError::Syntax {
                line: line_number,
                input: body.trim().to_string(),
            }))
        }
        Err(nom::Err::Incomplete(_)) => Err(ActionError::Syntax {
            line: line_number,
            input: body.trim().to_string(),
        }),
    }
}

fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or_default()
}

/// Parse a single action.
pub fn parse_action(line: &str) -> std::result::Result<Action, ActionError> {
    parse_line(line, 1)
}

/// Parse one action per line, skipping blank lines and `#` comments.
pub fn parse_script(text: &str) -> std::result::Result<Vec<Action>, ActionError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !strip_comment(line).trim().is_empty())
        .map(|(i, line)| parse_line(line, i + 1))
        .collect()
}

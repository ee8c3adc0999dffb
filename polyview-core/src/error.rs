/// Error types for matrix construction, point transforms and action parsing
use thiserror::Error;

/// Failures raised while building or applying a transformation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("direction vector cannot be zero")]
    ZeroLengthDirection,

    #[error("axis points must be distinct")]
    CoincidentAxisPoints,

    #[error("plane must be 'XY', 'XZ', or 'YZ', got '{0}'")]
    UnknownPlane(String),

    #[error("axis must be 'X', 'Y', or 'Z', got '{0}'")]
    UnknownAxis(String),

    #[error("eye distance cannot be zero")]
    ZeroEyeDistance,

    #[error("face index {index} out of range for {vertex_count} vertices")]
    FaceIndexOutOfRange { index: usize, vertex_count: usize },

    /// The homogeneous w component came out as zero
    #[error("homogeneous divide by zero (w = 0)")]
    DegenerateHomogeneousDivide,
}

impl GeometryError {
    /// True for the argument-validation family of errors.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, GeometryError::DegenerateHomogeneousDivide)
    }
}

/// Failures raised while parsing or executing a textual action
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("line {line}: cannot parse '{input}'")]
    Syntax { line: usize, input: String },

    #[error("unknown solid '{0}'")]
    UnknownSolid(String),

    #[error("unknown projection '{0}'")]
    UnknownProjection(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

pub type Result<T, E = GeometryError> = std::result::Result<T, E>;

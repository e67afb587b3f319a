use super::projection::{ProjectionError};

/// Errors returned when reading or writing through an index expression.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index expression has {got} items but the array has {rank} dimensions")]
    IndexArity { got: usize, rank: usize },

    #[error("an index expression can contain at most one Ellipsis")]
    MultipleEllipsis,

    #[error("index {index} out of range for axis {axis} of length {len}")]
    IndexOutOfRange { index: i64, axis: usize, len: usize },

    #[error("invalid index for axis {axis}: {reason}")]
    IndexType { axis: usize, reason: String },

    #[error("cannot assign a value of shape {value:?} to a selection of shape {target:?}")]
    DimensionMismatch { value: Vec<usize>, target: Vec<usize> },

    #[error("expected {expected} dimensions to describe an array of shape {shape:?}, got {got}")]
    DimensionCount { expected: usize, got: usize, shape: Vec<usize> },

    #[error("dimension {axis} has length {dim_len} but the array axis has length {len}")]
    DimensionLength { axis: usize, dim_len: usize, len: usize },

    #[error("coordinate values of axis {axis} are not monotonic")]
    NonMonotonic { axis: usize },

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl IndexError {
    pub(crate) fn index_type(axis: usize, reason: impl Into<String>) -> Self {
        IndexError::IndexType { axis, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;

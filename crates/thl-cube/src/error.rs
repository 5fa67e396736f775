//! Error types for payload loading and decoding
//!
//! Every variant is a structural error: the payload cannot be decoded and no
//! record is produced for it.

use std::path::PathBuf;

/// Errors raised while loading or decoding a pivot payload
#[derive(Debug, thiserror::Error)]
pub enum CubeError {
    /// Payload is not JSON, or lacks the `dataset`/`dimension`/`value` blocks
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading a payload file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `dimension.id` and `dimension.size` have different lengths
    #[error("dimension id list has {ids} entries but size list has {sizes}")]
    DimensionMismatch { ids: usize, sizes: usize },

    /// A dimension listed in `dimension.id` has no category block
    #[error("dimension '{0}' has no category block")]
    MissingDimension(String),

    /// A dimension declares size zero
    #[error("dimension '{0}' has size zero")]
    EmptyDimension(String),

    /// Declared size disagrees with the number of categories
    #[error("dimension '{name}' declares size {size} but has {found} categories")]
    CategoryCount {
        name: String,
        size: usize,
        found: usize,
    },

    /// Category positions are not exactly `0..size`
    #[error("dimension '{name}' has invalid category position {position}")]
    CategoryPosition { name: String, position: usize },

    /// Product of the dimension sizes does not fit in a cell index
    #[error("cube size overflows: product of dimension sizes exceeds u64")]
    SizeOverflow,

    /// A value key is not a non-negative integer
    #[error("value key '{0}' is not a cell index")]
    InvalidIndex(String),

    /// A present index lies outside the cube
    #[error("value index {index} out of range for cube of {cells} cells")]
    IndexOutOfRange { index: u64, cells: u64 },

    /// A coordinate lies outside its dimension
    #[error("coordinate {coordinate} out of range for dimension of size {size}")]
    CoordinateOutOfRange { coordinate: usize, size: u64 },

    /// Coordinate count differs from the dimension count
    #[error("expected {expected} coordinates, got {actual}")]
    CoordinateCount { expected: usize, actual: usize },

    /// A raw value is neither a number nor a string
    #[error("value at index {0} is neither a number nor a string")]
    InvalidValue(u64),
}

impl CubeError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for cube operations
pub type CubeResult<T> = Result<T, CubeError>;

//! Error types for merging, compaction and output
//!
//! Every error is fatal for the run. Records already written stay written;
//! callers must treat the output as truncated.

use thl_cube::CubeError;

/// A raw value that does not fit its declared coercion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot read '{raw}' as {target}")]
pub struct CoercionFailure {
    /// Raw value as it appeared in the cell
    pub raw: String,
    /// Name of the target type
    pub target: &'static str,
}

impl CoercionFailure {
    /// Create coercion failure
    pub fn new(raw: impl Into<String>, target: &'static str) -> Self {
        Self {
            raw: raw.into(),
            target,
        }
    }
}

/// Errors raised while compacting narrow records into wide records
#[derive(Debug, thiserror::Error)]
pub enum CompactError {
    /// Discriminator value outside the documented set
    #[error("unknown {field} '{value}' at cell {index}")]
    UnknownDiscriminator {
        field: String,
        value: String,
        index: u64,
    },

    /// Value failed its declared coercion
    #[error("field '{field}' at cell {index}: {source}")]
    Coercion {
        field: String,
        index: u64,
        #[source]
        source: CoercionFailure,
    },

    /// Record lacks a field the descriptor relies on
    #[error("field '{field}' missing from cell {index}")]
    MissingField { field: String, index: u64 },

    /// Payload could not be decoded
    #[error(transparent)]
    Cube(#[from] CubeError),

    /// Record could not be serialized
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Output sink failed
    #[error("io error writing records: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of fatal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Payload blocks missing or inconsistent
    Structural,
    /// Unknown discriminator reached a merge policy
    Dispatch,
    /// Value did not fit its coercion
    Coercion,
    /// Writing the output failed
    Output,
}

impl CompactError {
    /// Create unknown discriminator error
    pub fn unknown_discriminator(
        field: impl Into<String>,
        value: impl Into<String>,
        index: u64,
    ) -> Self {
        Self::UnknownDiscriminator {
            field: field.into(),
            value: value.into(),
            index,
        }
    }

    /// Create missing field error
    pub fn missing_field(field: impl Into<String>, index: u64) -> Self {
        Self::MissingField {
            field: field.into(),
            index,
        }
    }

    /// Classify error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownDiscriminator { .. } => ErrorKind::Dispatch,
            Self::Coercion { .. } => ErrorKind::Coercion,
            Self::MissingField { .. } | Self::Cube(_) => ErrorKind::Structural,
            Self::Serialize(_) | Self::Io(_) => ErrorKind::Output,
        }
    }
}

/// Result type alias for compaction
pub type CompactResult<T> = Result<T, CompactError>;

//! Error types for catalog lookups

/// Errors raised by the dataset catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// No dataset registered under this name
    #[error("unknown dataset '{name}' (available: {available})")]
    UnknownDataset { name: String, available: String },
}

impl DatasetError {
    /// Create unknown dataset error listing the known names
    pub fn unknown<'a>(name: impl Into<String>, known: impl IntoIterator<Item = &'a str>) -> Self {
        Self::UnknownDataset {
            name: name.into(),
            available: known.into_iter().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Result type alias for catalog operations
pub type DatasetResult<T> = Result<T, DatasetError>;

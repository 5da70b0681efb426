use thiserror::Error;

/// Errors surfaced to the UI layer for user correction. Storage and network
/// failures never appear here; those degrade in place (fallback defaults,
/// "weather error" display state) rather than propagating.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("{field} is required")]
    Validation { field: &'static str },

    #[error("index {index} is out of bounds for list of length {len}")]
    Index { index: usize, len: usize },

    #[error("no background named {name} in the current catalog")]
    UnknownImage { name: String },
}

/// Internal storage failure. Swallowed by [`crate::runtime::storage::Store`]
/// after logging; callers only ever see fallback values.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage write failed: {0}")]
    Write(#[from] std::io::Error),
}

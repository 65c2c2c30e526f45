//! Error types for the export library.

use thiserror::Error;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No objects were given to export
    #[error("No objects to export")]
    EmptyInput,

    /// The reference object has no position attribute
    #[error("Point Cloud has no 'position' attribute.")]
    MissingPosition,

    /// Attribute data length does not match the declared point count
    #[error("Attribute '{attribute}' has {actual} values, expected {expected}")]
    AttributeLengthMismatch {
        attribute: String,
        expected: usize,
        actual: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for gridstyle-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable errors.
///
/// Coordinates outside a sheet passed to the style engine are caller bugs and
/// panic instead; only parsing and sheet sizing report errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u32),

    /// A sheet cannot be given this size
    #[error("Invalid sheet size {cols}x{rows} (max: {max_cols}x{max_rows})")]
    InvalidSheetSize {
        cols: u32,
        rows: u32,
        max_cols: u32,
        max_rows: u32,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}

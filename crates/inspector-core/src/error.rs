//! Error types.

use thiserror::Error;

/// Errors produced by the inspector engine.
///
/// Load failures (`Io`, `Parse`) are recoverable: the session falls back to the
/// "no document" state and reports them. The remaining variants signal that a caller broke an
/// invariant of the tree-table contract.
#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("I/O error: {0}")]
    /// Reading a source file failed.
    Io(#[from] std::io::Error),

    #[error("could not parse {source_name}: {message}")]
    /// The source parser rejected the document.
    Parse {
        /// File name, or `<memory>` for text opened directly.
        source_name: String,
        /// Parser message.
        message: String,
    },

    #[error("Unknown column: {0}")]
    /// A column index outside the five tree-table columns.
    UnknownColumn(usize),

    #[error("row {0} is not visible")]
    /// A row index outside the currently visible rows.
    RowOutOfRange(usize),

    #[error("node handle does not belong to the installed tree")]
    /// A node handle from a tree that has since been replaced.
    StaleNode,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InspectorError>;

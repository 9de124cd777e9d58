//! Centralized error handling for the canopy crate.
//!
//! Library code returns [`Result`] with the typed [`CanopyError`] enum; the
//! binary converts at its edge via `anyhow`. The [`ResultExt`] trait adds a
//! `.context()` method so call sites can attach a short description to any
//! error that converts into [`CanopyError`]:
//!
//! ```no_run
//! use canopy::error::{Result, ResultExt as _};
//!
//! fn read_selection(path: &str) -> Result<String> {
//!     let content = std::fs::read_to_string(path).context("Failed to read selection")?;
//!     Ok(content)
//! }
//! ```

use std::fmt;

/// Main error type for canopy operations.
#[derive(Debug)]
pub enum CanopyError {
    /// I/O errors (file operations)
    Io(std::io::Error),

    /// Data processing errors (Polars, parsing)
    DataProcessing(String),

    /// A column the operation requires is absent from the dataset
    MissingColumn(String),

    /// A selected feature has no binning scheme and cannot split rows
    UnsplittableFeature(String),

    /// File extension the loader does not recognize
    UnsupportedFormat(String),

    /// Snapshot/metadata export errors
    Export(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for CanopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::MissingColumn(name) => write!(f, "Dataset has no '{name}' column"),
            Self::UnsplittableFeature(name) => {
                write!(f, "Feature '{name}' cannot be used to split rows")
            }
            Self::UnsupportedFormat(ext) => write!(f, "Unsupported file extension: {ext}"),
            Self::Export(msg) => write!(f, "Export error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CanopyError {}

impl From<std::io::Error> for CanopyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for CanopyError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<serde_json::Error> for CanopyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Export(format!("JSON error: {err}"))
    }
}

impl From<anyhow::Error> for CanopyError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Result type alias for canopy operations.
pub type Result<T> = std::result::Result<T, CanopyError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CanopyError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: CanopyError = e.into();
            CanopyError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: CanopyError = e.into();
            CanopyError::Other(format!("{}: {}", f(), err))
        })
    }
}

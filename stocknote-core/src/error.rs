//! Structured error types for table, session, and config operations.
//!
//! These are designed to be displayable in both CLI and TUI contexts.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading, validating, or writing a spreadsheet.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot read {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("unsupported file type '{0}' (expected .xlsx, .xlsm, .xls, .ods or .csv)")]
    UnsupportedFormat(String),

    #[error("cannot write {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
}

impl TableError {
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TableError::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TableError::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// An event the session cannot apply in its current state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no spreadsheet loaded")]
    NoTable,

    #[error("no company selected")]
    NoSelection,

    #[error("company '{0}' not found")]
    UnknownCompany(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

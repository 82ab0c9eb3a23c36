//! Error type shared by every stage of a debug session.
//!
//! Each failure is fatal to the session that produced it: nothing in this crate retries,
//! so the variants carry enough context (paths, line numbers, kernel names) for the
//! caller to report the problem and decide what to do with the temp notebook.

use std::{io, path::PathBuf};

/// Result type used throughout the crate.
pub type DebugResult<T> = Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The callable's source is not valid Python.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    /// No module-level function with this name exists in the file.
    #[error("no module-level function named `{name}` in {}", path.display())]
    CallableNotFound { name: String, path: PathBuf },
    /// The function exists but its shape can't be represented as notebook cells.
    #[error("cannot debug `{name}`: {reason}")]
    UnsupportedCallable { name: String, reason: &'static str },
    /// The requested kernel isn't registered on this host.
    #[error("no such kernel: {name}")]
    KernelNotFound { name: String },
    /// A `kernel.json` file exists but couldn't be understood.
    #[error("invalid kernel spec {}: {message}", path.display())]
    InvalidKernelSpec { path: PathBuf, message: String },
    /// A notebook file couldn't be decoded or encoded.
    #[error("invalid notebook {}: {source}", path.display())]
    Notebook {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Parameterization failed; the notebook may be left partially modified.
    #[error("parameter injection failed: {message}")]
    Injection { message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a missing file, e.g. closing a session twice.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

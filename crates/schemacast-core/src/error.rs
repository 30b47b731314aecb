use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Core error type shared across schemacast crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A required run parameter is missing or empty.
    #[error("precondition failed: {0}")]
    Precondition(String),
    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
    /// The source connection could not be built or opened.
    #[error("connection error: {0}")]
    Connect(String),
    /// The catalog query failed or returned rows that could not be read.
    #[error("catalog query error: {0}")]
    Query(String),
    /// An output directory or artifact could not be created or written.
    #[error("output error at {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Wrap an I/O failure with the path it happened on.
    pub fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Output {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for results returned by schemacast crates.
pub type Result<T> = std::result::Result<T, Error>;

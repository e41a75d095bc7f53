use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a report run.
///
/// Missing optional fields, zero totals, exited processes and programs with no
/// running instance are not errors; they surface as zero or empty values.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot read {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{tool}: command not found")]
    ToolNotFound { tool: String },

    #[error("{tool} failed: {message}")]
    ToolExecutionError { tool: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

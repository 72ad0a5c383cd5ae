/*!
 * Error types for the voxbeowulf application.
 *
 * This module contains custom error types for the parts of the pipeline that
 * have well-defined failure modes, using the thiserror crate for ergonomic
 * error definitions. Orchestration code wraps these in `anyhow` with context.
 */

use thiserror::Error;

/// Errors that can occur while obtaining the source document
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP request could not be completed
    #[error("Request to {url} failed: {message}")]
    Request {
        /// URL that was requested
        url: String,
        /// Transport error description
        message: String,
    },

    /// The server answered with a non-success status
    #[error("{url} responded with status {status_code}")]
    Status {
        /// URL that was requested
        url: String,
        /// HTTP status code
        status_code: u16,
    },

    /// The local cache copy could not be read or written
    #[error("Cache file {path} unusable: {message}")]
    Cache {
        /// Cache file path
        path: String,
        /// IO error description
        message: String,
    },
}

/// Errors raised when addressing fitts
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FittError {
    /// The requested fitt is the one the manuscript does not have
    #[error("Fitt {0} does not exist")]
    Reserved(usize),

    /// The requested fitt index is past the end of the numbering table
    #[error("Fitt {index} is out of range (last fitt is {max})")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Highest valid index
        max: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error fetching the source document
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error addressing a fitt
    #[error("Fitt error: {0}")]
    Fitt(#[from] FittError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Category of an acquisition failure, used for logging and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcquisitionErrorKind {
    Connection, // transport failure
    Timeout,    // request timed out
    NotFound,   // 404
    Status,     // any other non-success status
    Parse,      // page markup did not have the expected shape
    Storage,    // local file system error
}

impl AcquisitionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionErrorKind::Connection => "connection",
            AcquisitionErrorKind::Timeout => "timeout",
            AcquisitionErrorKind::NotFound => "not_found",
            AcquisitionErrorKind::Status => "status",
            AcquisitionErrorKind::Parse => "parse",
            AcquisitionErrorKind::Storage => "storage",
        }
    }
}

/// Errors that can occur while reading the taxonomy or acquiring a painting.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Expected {what} missing on {url}")]
    MissingMarkup { url: String, what: &'static str },

    #[error("Invalid selector {selector}: {reason}")]
    InvalidSelector {
        selector: &'static str,
        reason: String,
    },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AcquisitionError {
    pub fn kind(&self) -> AcquisitionErrorKind {
        match self {
            AcquisitionError::Transport { source, .. } if source.is_timeout() => {
                AcquisitionErrorKind::Timeout
            }
            AcquisitionError::Transport { .. } => AcquisitionErrorKind::Connection,
            AcquisitionError::Status { status: 404, .. } => AcquisitionErrorKind::NotFound,
            AcquisitionError::Status { .. } => AcquisitionErrorKind::Status,
            AcquisitionError::MissingMarkup { .. }
            | AcquisitionError::InvalidSelector { .. }
            | AcquisitionError::InvalidUrl { .. } => AcquisitionErrorKind::Parse,
            AcquisitionError::Io { .. } => AcquisitionErrorKind::Storage,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AcquisitionError::Io {
            path: path.into(),
            source,
        }
    }
}

//! Per-request fixture errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving a request to a stored definition.
///
/// None of these are fatal; each is reported on the offending response only.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// No route, verb or variant file matches the request.
    #[error("{0}")]
    NotFound(String),

    /// The variant file exists but is not a valid definition.
    #[error("malformed definition {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The variant file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FixtureError {
    /// Whether the failure is the client's (404) rather than the fixture author's (500).
    pub fn is_not_found(&self) -> bool {
        matches!(self, FixtureError::NotFound(_))
    }
}

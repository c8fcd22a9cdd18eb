//! Error types for crew-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading an agent roster.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Underlying I/O failure (permission denied, not a file, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML/JSON parse error on load, with file path and line context from serde_yaml.
    #[error("failed to parse roster at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The roster file did not exist at the expected path.
    #[error("roster not found at {path}")]
    RosterNotFound { path: PathBuf },
}

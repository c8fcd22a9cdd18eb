//! Error types for crew-sync.

use std::path::PathBuf;

use thiserror::Error;

use crew_renderer::RenderError;

/// Errors that abort a whole reconciliation pass.
///
/// Per-agent problems are never errors; they surface as
/// [`crate::SkipReason`] entries in the report.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (generated config).
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

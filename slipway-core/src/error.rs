//! Error types for slipway-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while building a [`crate::DeploymentContext`].
#[derive(Debug, Error)]
pub enum ContextError {
    /// Underlying I/O failure while scanning the project tree.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project root does not exist or is not a directory.
    #[error("project root {path} is not a directory")]
    RootNotFound { path: PathBuf },

    /// No Django settings module was found under the project root.
    #[error("no settings.py found under {root}; is this a Django project?")]
    SettingsNotFound { root: PathBuf },
}

/// Convenience constructor for [`ContextError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ContextError {
    ContextError::Io {
        path: path.into(),
        source,
    }
}

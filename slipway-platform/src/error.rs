//! Error types for slipway-platform.

use std::time::Duration;

use thiserror::Error;

use slipway_core::AppName;

/// Failure of one external CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The command could not be spawned (binary missing, permissions).
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited non-zero.
    #[error("`{program}` failed (status {status}): {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// All errors that can arise while provisioning remote resources.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A create/attach command failed.
    #[error("provisioning command failed: {0}")]
    Cli(#[from] CliError),

    /// The platform reported the app name as taken. Retried runs land here
    /// instead of silently treating re-creation as success.
    #[error("app '{name}' already exists on Scalingo")]
    AppAlreadyExists { name: AppName },

    /// The database did not report ready within the maximum wait window.
    /// Distinct from create/attach failures: the resources were requested,
    /// readiness was just never observed.
    #[error("database not ready after {}s; check `scalingo --app {app} addons`", waited.as_secs())]
    Timeout { app: AppName, waited: Duration },
}

/// All errors that can arise during commit / push / open.
///
/// A failed open after a successful push is NOT an error — see
/// [`crate::finalize::FinalizeOutcome::open_warning`].
#[derive(Debug, Error)]
pub enum FinalizeError {
    /// `git add` / `git commit` failed.
    #[error("commit failed: {0}")]
    Commit(#[source] CliError),

    /// `git push scalingo main` failed.
    #[error("push to Scalingo failed: {0}")]
    Push(#[source] CliError),
}

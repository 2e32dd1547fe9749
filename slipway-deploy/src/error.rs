//! Error types for slipway-deploy.
//!
//! The taxonomy follows the run's phases: [`ValidationError`] before any
//! mutation, [`ProvisionError`] / [`FinalizeError`] for the automated remote
//! phases, [`MutateError`] for a failed file-system step. Every fatal kind
//! bubbles to the top-level caller as one [`DeployError`]; nothing is
//! swallowed.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use slipway_platform::{CliError, FinalizeError, ProvisionError};
use slipway_renderer::RenderError;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Preflight incompatibility: the local project or environment cannot be
/// configured for Scalingo. Always raised before any mutation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required project file is absent.
    #[error("missing {what} at {path}")]
    Missing { what: &'static str, path: PathBuf },

    /// The project is not a git repository; Scalingo deploys via git push.
    #[error("{path} is not a git repository; run `git init` first")]
    NotARepository { path: PathBuf },

    /// A required local tool is unavailable.
    #[error("'{tool}' not found on PATH: {source}")]
    ToolMissing {
        tool: String,
        #[source]
        source: CliError,
    },

    /// Underlying I/O failure while checking the project.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Names of the project mutation steps, used in error and progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepName {
    RuntimePin,
    Procfile,
    PostDeployHook,
    Requirements,
    SettingsPatch,
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepName::RuntimePin => write!(f, "runtime-pin"),
            StepName::Procfile => write!(f, "procfile"),
            StepName::PostDeployHook => write!(f, "post-deploy-hook"),
            StepName::Requirements => write!(f, "requirements"),
            StepName::SettingsPatch => write!(f, "settings-patch"),
        }
    }
}

/// A specific mutation step failed. Identifies the step and target path; no
/// rollback is attempted — earlier steps' changes remain on disk and re-runs
/// are safe.
#[derive(Debug, Error)]
#[error("step '{step}' failed at {path}: {source}")]
pub struct MutateError {
    pub step: StepName,
    pub path: PathBuf,
    #[source]
    pub source: MutateCause,
}

/// Underlying cause of a [`MutateError`].
#[derive(Debug, Error)]
pub enum MutateCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Convenience constructor for I/O-caused [`MutateError`]s.
pub(crate) fn step_io_err(
    step: StepName,
    path: impl Into<PathBuf>,
    source: std::io::Error,
) -> MutateError {
    MutateError {
        step,
        path: path.into(),
        source: MutateCause::Io(source),
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// All errors that can abort a deployment run.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Preflight failed; nothing was modified.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Remote resource creation or readiness failed (automate-all only).
    #[error("provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    /// A project mutation step failed.
    #[error("project mutation failed: {0}")]
    Mutate(#[from] MutateError),

    /// Commit or push failed (automate-all only).
    #[error("deployment failed: {0}")]
    Finalize(#[from] FinalizeError),

    /// The template engine could not be constructed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

//! Commit, push, and open the deployed app.
//!
//! Invoked only in automate-all mode, after every mutation step has run.
//! Commit and push failures are fatal; a failed open after a successful push
//! is a soft warning — the push is the deployment, opening the app is a
//! convenience. That distinction decides whether the user sees a success or
//! failure message, so it is encoded in the return type rather than logged
//! away.

use slipway_core::DeploymentContext;

use crate::error::FinalizeError;
use crate::provision::SCALINGO_BIN;
use crate::runner::CommandRunner;

/// Commit message for the single configuration commit.
pub const COMMIT_MESSAGE: &str = "Configure project for deployment to Scalingo";

/// Region-qualified app domain.
const APP_DOMAIN: &str = "osc-fr1.scalingo.io";

/// Outcome of a successful finalize: the deployment went through; the open
/// step may still have produced a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOutcome {
    pub deployed_url: String,
    /// Set when `scalingo open` failed after a successful push.
    pub open_warning: Option<String>,
}

/// Commit all pending changes as one commit, push to the Scalingo remote,
/// and open the deployed app. Records the deployed URL in the context.
pub fn finalize<R: CommandRunner>(
    runner: &R,
    ctx: &mut DeploymentContext,
) -> Result<FinalizeOutcome, FinalizeError> {
    let app_name = ctx.deployed_name_or_default();
    let root = ctx.project_root().to_path_buf();

    log::info!("committing configuration changes");
    runner
        .run_checked(&root, "git", &["add", "-A"])
        .map_err(FinalizeError::Commit)?;
    runner
        .run_checked(&root, "git", &["commit", "-m", COMMIT_MESSAGE])
        .map_err(FinalizeError::Commit)?;

    log::info!("pushing to Scalingo");
    runner
        .run_checked(&root, "git", &["push", "scalingo", "main"])
        .map_err(FinalizeError::Push)?;

    let deployed_url = format!("https://{}.{APP_DOMAIN}", app_name.0);
    ctx.set_deployed_url(deployed_url.clone());

    log::info!("opening deployed app");
    let open_warning = match runner.run_checked(
        &root,
        SCALINGO_BIN,
        &["--app", &app_name.0, "open"],
    ) {
        Ok(_) => None,
        Err(e) => {
            log::warn!("could not open deployed app: {e}");
            Some(format!("could not open deployed app: {e}"))
        }
    };

    Ok(FinalizeOutcome {
        deployed_url,
        open_warning,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
